//! Starter-tracking entities as persisted and served over the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{convert_ai_analysis_to_ui, RawAiAnalysis, UiAnalysisViewModel};

// ============================================================================
// Health Status
// ============================================================================

/// Coarse starter health shown on list cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Attention,
    Unhealthy,
}

impl HealthStatus {
    /// Classify a 0-10 health score.
    /// - >= 7: healthy
    /// - >= 4: attention
    /// - else: unhealthy
    pub fn from_health_score(score: f64) -> Self {
        match score {
            s if s >= 7.0 => HealthStatus::Healthy,
            s if s >= 4.0 => HealthStatus::Attention,
            _ => HealthStatus::Unhealthy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Attention => "attention",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

// ============================================================================
// Starter
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Starter {
    pub id: String,
    pub name: String,
    pub flour_type: String,
    pub hydration_pct: f64,
    pub default_ratio: String, // e.g. "1:1:1"
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_fed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
    pub health_status: HealthStatus,
}

/// Fields supplied when creating a starter; id and creation time are assigned.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStarter {
    pub name: String,
    pub flour_type: String,
    pub hydration_pct: f64,
    pub default_ratio: String,
    #[serde(default)]
    pub last_fed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_uri: Option<String>,
    #[serde(default)]
    pub health_status: HealthStatus,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarterUpdate {
    pub name: Option<String>,
    pub flour_type: Option<String>,
    pub hydration_pct: Option<f64>,
    pub default_ratio: Option<String>,
    pub last_fed_at: Option<DateTime<Utc>>,
    pub image_uri: Option<String>,
    pub health_status: Option<HealthStatus>,
}

impl StarterUpdate {
    pub fn apply(self, starter: &mut Starter) {
        if let Some(name) = self.name {
            starter.name = name;
        }
        if let Some(flour_type) = self.flour_type {
            starter.flour_type = flour_type;
        }
        if let Some(hydration) = self.hydration_pct {
            starter.hydration_pct = hydration;
        }
        if let Some(ratio) = self.default_ratio {
            starter.default_ratio = ratio;
        }
        if let Some(fed_at) = self.last_fed_at {
            starter.last_fed_at = Some(fed_at);
        }
        if let Some(uri) = self.image_uri {
            starter.image_uri = Some(uri);
        }
        if let Some(status) = self.health_status {
            starter.health_status = status;
        }
    }
}

// ============================================================================
// Feeding
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feeding {
    pub id: String,
    pub starter_id: String,
    pub fed_at: DateTime<Utc>,
    pub ratio: String,
    pub starter_weight: f64, // grams
    pub flour_weight: f64,
    pub water_weight: f64,
    pub temp_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeeding {
    /// Taken from the route when posted over HTTP.
    #[serde(default)]
    pub starter_id: String,
    #[serde(default)]
    pub fed_at: Option<DateTime<Utc>>,
    /// Derived from the weights when omitted.
    #[serde(default)]
    pub ratio: Option<String>,
    pub starter_weight: f64,
    pub flour_weight: f64,
    pub water_weight: f64,
    pub temp_c: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Format a starter:flour:water ratio from gram weights ("50:50:50", "25:50:62.5").
pub fn feed_ratio(starter_weight: f64, flour_weight: f64, water_weight: f64) -> String {
    format!("{}:{}:{}", starter_weight, flour_weight, water_weight)
}

// ============================================================================
// Photo Analysis
// ============================================================================

/// Context the user supplies alongside a photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisContext {
    pub time_since_feed: String,
    pub last_feed_ratio: String,
    pub flour_type: String,
    pub room_temp_f: f64,
    pub goal: String, // baking | maintenance | troubleshoot | revive, or free text
}

/// Legacy structured assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub health_status: HealthStatus,
    pub rise_height: f64,    // percent
    pub bubble_density: f64, // percent
    pub activity_stage: String,
    pub rating: f64, // 1-5
    pub next_step: String,
    pub confidence: f64, // 0-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The two shapes an analysis can take, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisRecord {
    Structured(AnalysisResult),
    Ai {
        analysis: RawAiAnalysis,
        context: AnalysisContext,
    },
}

impl AnalysisRecord {
    /// Starter health implied by this analysis.
    /// AI ratings (1-5) are doubled onto the 10-point health score scale.
    pub fn health_status(&self) -> HealthStatus {
        match self {
            AnalysisRecord::Structured(result) => result.health_status,
            AnalysisRecord::Ai { analysis, .. } => {
                let rating = convert_ai_analysis_to_ui(analysis).rating;
                HealthStatus::from_health_score(rating as f64 * 2.0)
            }
        }
    }

    /// UI view-model, available for AI analyses only.
    pub fn view_model(&self) -> Option<UiAnalysisViewModel> {
        match self {
            AnalysisRecord::Ai { analysis, .. } => Some(convert_ai_analysis_to_ui(analysis)),
            AnalysisRecord::Structured(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAnalysis {
    pub id: String,
    pub starter_id: String,
    pub taken_at: DateTime<Utc>,
    pub image_uri: String,
    pub record: AnalysisRecord,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhotoAnalysis {
    #[serde(default)]
    pub starter_id: String,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
    pub image_uri: String,
    pub record: AnalysisRecord,
}

// ============================================================================
// Chat
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub analysis_id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatMessage {
    pub analysis_id: String,
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}
