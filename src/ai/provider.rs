//! Provider seam between the server and the vision/chat model.

use async_trait::async_trait;

use crate::analysis::RawAiAnalysis;
use crate::domain::AnalysisContext;
use crate::errors::{AiError, AiResult};

#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    /// Diagnose one starter photo. `image_base64` is the bare base64 payload.
    async fn analyze_image(
        &self,
        api_key: &str,
        image_base64: &str,
        context: &AnalysisContext,
    ) -> AiResult<RawAiAnalysis>;

    /// One chat turn; `context` is an analysis summary for the system prompt.
    async fn chat(&self, api_key: &str, message: &str, context: Option<&str>) -> AiResult<String>;
}

/// Pick the configured key over the stored one; blank keys count as missing.
pub fn resolve_api_key(configured: Option<&str>, stored: Option<String>) -> AiResult<String> {
    configured
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .or_else(|| stored.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()))
        .ok_or(AiError::MissingApiKey)
}
