//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::Value;

use crate::ai::prompt::{chat_system_prompt, diagnostic_prompt};
use crate::ai::provider::AnalysisProvider;
use crate::ai::response::{
    analysis_request_body, chat_completion_content, chat_request_body, parse_analysis_content,
};
use crate::analysis::RawAiAnalysis;
use crate::config::{ServerConfig, DEFAULT_API_URL, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL};
use crate::domain::AnalysisContext;
use crate::errors::{AiError, AiResult};

pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Accept bare base64 or a `data:<mime>;base64,` URI and return canonical
/// base64 of the decoded bytes.
pub fn normalize_image_base64(input: &str) -> AiResult<String> {
    let payload = match input.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => input,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AiError::Image(e.to_string()))?;
    if bytes.is_empty() {
        return Err(AiError::Image("image is empty".into()));
    }
    Ok(encode_image(&bytes))
}

pub struct OpenAiClient {
    client: Client,
    api_url: String,
    image_model: String,
    chat_model: String,
}

impl OpenAiClient {
    pub fn new(api_url: impl Into<String>, image_model: impl Into<String>, chat_model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            image_model: image_model.into(),
            chat_model: chat_model.into(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.api_url, &config.image_model, &config.chat_model)
    }

    async fn complete(&self, api_key: &str, body: &Value) -> AiResult<String> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Could not read error body: {}", e);
                    String::new()
                }
            };
            tracing::warn!("Completion request failed with {}", status);
            return Err(AiError::Api { status: status.as_u16(), body });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;
        Ok(chat_completion_content(&json)?.to_string())
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_IMAGE_MODEL, DEFAULT_CHAT_MODEL)
    }
}

#[async_trait]
impl AnalysisProvider for OpenAiClient {
    async fn analyze_image(
        &self,
        api_key: &str,
        image_base64: &str,
        context: &AnalysisContext,
    ) -> AiResult<RawAiAnalysis> {
        let image = normalize_image_base64(image_base64)?;
        let body = analysis_request_body(&self.image_model, &diagnostic_prompt(context), &image);

        tracing::info!("Requesting image analysis from {}", self.image_model);
        let content = self.complete(api_key, &body).await?;

        parse_analysis_content(&content).map_err(|e| {
            tracing::error!("Failed to parse analysis result: {}", e);
            e
        })
    }

    async fn chat(&self, api_key: &str, message: &str, context: Option<&str>) -> AiResult<String> {
        let body = chat_request_body(&self.chat_model, &chat_system_prompt(context), message);
        tracing::debug!("Sending chat message to {}", self.chat_model);
        self.complete(api_key, &body).await
    }
}
