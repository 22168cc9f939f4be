//! View Models for Starter Analysis
//!
//! Fixed-shape, UI-ready types produced from a raw AI analysis.
//! Field names serialize in camelCase to match what presentation code consumes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Five synthetic rise heights, oldest to newest.
pub type RiseCurve = [f64; 5];

// ============================================================================
// Health Status
// ============================================================================

/// Display descriptor for a 1-5 health rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatusDescriptor {
    pub text: &'static str,
    pub color: &'static str,
    pub chip: &'static str,
    pub chip_color: &'static str,
}

// ============================================================================
// Activity Stage
// ============================================================================

/// Canonical fermentation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityStage {
    Lag,
    EarlyGrowth,
    #[default]
    Peak,
    LateDecline,
    Dormant,
}

impl ActivityStage {
    pub const ALL: [ActivityStage; 5] = [
        ActivityStage::Lag,
        ActivityStage::EarlyGrowth,
        ActivityStage::Peak,
        ActivityStage::LateDecline,
        ActivityStage::Dormant,
    ];

    /// Canonical table key, e.g. `"early-growth"`.
    pub fn key(&self) -> &'static str {
        match self {
            ActivityStage::Lag => "lag",
            ActivityStage::EarlyGrowth => "early-growth",
            ActivityStage::Peak => "peak",
            ActivityStage::LateDecline => "late-decline",
            ActivityStage::Dormant => "dormant",
        }
    }
}

/// Position/color/label for one canonical stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityStageDescriptor {
    pub position: u8,
    pub color: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

// ============================================================================
// Bubble Pattern
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BubblePatternKind {
    Sparse,
    Moderate,
    Dense,
}

impl BubblePatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BubblePatternKind::Sparse => "sparse",
            BubblePatternKind::Moderate => "moderate",
            BubblePatternKind::Dense => "dense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BubblePatternDescriptor {
    pub count: u8,
    pub sizes: SmallVec<[u8; 8]>, // one radius per drawn bubble
    pub pattern: BubblePatternKind,
    pub description: &'static str,
}

// ============================================================================
// Aggregate
// ============================================================================

/// Complete view-model for one AI analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiAnalysisViewModel {
    // Health status
    pub health_status: HealthStatusDescriptor,
    pub rating: i64,

    // Activity stage
    pub activity_stage: ActivityStageDescriptor,

    // Visual elements
    pub colors: Vec<&'static str>, // 1-3 hex values
    pub bubble_pattern: BubblePatternDescriptor,
    pub rise_data: RiseCurve,

    pub confidence: u8,

    // Scores
    pub rise_score: i64,
    pub bubble_score: i64,

    // Text descriptions, passed through untouched
    pub rise_description: Option<String>,
    pub bubble_description: Option<String>,
    pub surface_description: Option<String>,
    pub color_description: Option<String>,
    pub recommendation: Option<String>,
    pub rationale: Option<String>,
}
