//! Starter Analysis Lookup Tables
//!
//! Fixed tables that turn loose AI vocabulary into display values:
//! - Color lexicon: keyword -> hex, grouped by hue (scan order matters)
//! - Activity stages: 5 canonical fermentation phases
//! - Stage synonyms: cleaned free-text tokens -> canonical stage
//! - Health status: 1-5 rating -> text/color/chip

use crate::analysis::view_models::{
    ActivityStage, ActivityStageDescriptor, HealthStatusDescriptor,
};

/// A single keyword in the color lexicon
#[derive(Debug, Clone, Copy)]
pub struct ColorToken {
    pub keyword: &'static str,
    pub hex: &'static str,
}

const fn token(keyword: &'static str, hex: &'static str) -> ColorToken {
    ColorToken { keyword, hex }
}

// ============================================================================
// COLOR LEXICON
// Scanned in table order; several keywords share a hex value.
// ============================================================================

static STARTER_COLORS: &[ColorToken] = &[
    // Cream / white
    token("light-cream", "#FFF8DC"),
    token("cream", "#F5F5DC"),
    token("ivory", "#FFFFF0"),
    token("off-white", "#FAF0E6"),
    token("creamy-white", "#FDF5E6"),
    token("pearl", "#F8F6F0"),

    // Beige / tan
    token("beige", "#F5F5DC"),
    token("light-beige", "#F7F3E3"),
    token("tan", "#D2B48C"),
    token("light-tan", "#E6D3A3"),
    token("wheat", "#F5DEB3"),
    token("bisque", "#FFE4C4"),

    // Gray
    token("gray-white", "#F5F5F5"),
    token("light-gray", "#D3D3D3"),
    token("gray", "#808080"),
    token("grayish", "#C0C0C0"),
    token("dove-gray", "#6D6D6D"),

    // Yellow (healthy fermentation)
    token("pale-yellow", "#FFFFE0"),
    token("light-yellow", "#FFFF99"),
    token("golden", "#FFD700"),
    token("straw", "#E4D96F"),

    // Brown (whole grain starters)
    token("light-brown", "#CD853F"),
    token("brown", "#A0522D"),
    token("wheat-brown", "#D2691E"),
    token("caramel", "#C77B3C"),

    // Warning signs
    token("pink-tinted", "#FFB6C1"),
    token("orange-tinted", "#FFE4B5"),
    token("greenish", "#90EE90"),
    token("bluish", "#ADD8E6"),
    token("moldy-green", "#228B22"),

    // Activity descriptors
    token("uniform", "#F5F5DC"),
    token("consistent", "#FFF8DC"),
    token("natural", "#FAF0E6"),
];

/// Seeded into the palette when no keyword matches (light cream, cream).
pub const DEFAULT_CREAM_COLORS: [&str; 2] = ["#FFF8DC", "#F5F5DC"];

/// Padding candidates used to bring a short palette up to three colors.
pub const FALLBACK_PALETTE: [&str; 3] = ["#F5F5DC", "#FAF0E6", "#E6D3A3"];

/// Maximum palette length returned to the UI.
pub const MAX_PALETTE_COLORS: usize = 3;

/// Full lexicon in scan order.
pub fn color_lexicon() -> &'static [ColorToken] {
    STARTER_COLORS
}


// ============================================================================
// ACTIVITY STAGES
// ============================================================================

static LAG: ActivityStageDescriptor = ActivityStageDescriptor {
    position: 0,
    color: "#6B7280", // Gray
    label: "Lag Phase",
    description: "Starter is adapting, minimal visible activity",
};

static EARLY_GROWTH: ActivityStageDescriptor = ActivityStageDescriptor {
    position: 1,
    color: "#F59E0B", // Yellow
    label: "Early Growth",
    description: "Initial fermentation activity beginning",
};

static PEAK: ActivityStageDescriptor = ActivityStageDescriptor {
    position: 2,
    color: "#10B981", // Green
    label: "Peak Activity",
    description: "Maximum fermentation and rise",
};

static LATE_DECLINE: ActivityStageDescriptor = ActivityStageDescriptor {
    position: 3,
    color: "#EF4444", // Red
    label: "Late Decline",
    description: "Past peak, beginning to settle",
};

static DORMANT: ActivityStageDescriptor = ActivityStageDescriptor {
    position: 4,
    color: "#374151", // Dark gray
    label: "Dormant",
    description: "Minimal activity, needs feeding",
};

impl ActivityStage {
    /// Fixed display descriptor for this stage.
    pub fn descriptor(&self) -> &'static ActivityStageDescriptor {
        match self {
            ActivityStage::Lag => &LAG,
            ActivityStage::EarlyGrowth => &EARLY_GROWTH,
            ActivityStage::Peak => &PEAK,
            ActivityStage::LateDecline => &LATE_DECLINE,
            ActivityStage::Dormant => &DORMANT,
        }
    }
}

/// Cleaned stage tokens (lowercase letters and hyphens only) and their stage.
///
/// The first 14 entries are the letters-only vocabulary. `early-growth` and
/// `late-decline` are added on top because the diagnostic prompt asks the
/// model to answer with them; without these two both fall through to peak.
static STAGE_SYNONYMS: &[(&str, ActivityStage)] = &[
    ("lag", ActivityStage::Lag),
    ("lagphase", ActivityStage::Lag),
    ("early", ActivityStage::EarlyGrowth),
    ("earlygrowth", ActivityStage::EarlyGrowth),
    ("growth", ActivityStage::EarlyGrowth),
    ("peak", ActivityStage::Peak),
    ("peakactivity", ActivityStage::Peak),
    ("maximum", ActivityStage::Peak),
    ("decline", ActivityStage::LateDecline),
    ("latedecline", ActivityStage::LateDecline),
    ("falling", ActivityStage::LateDecline),
    ("dormant", ActivityStage::Dormant),
    ("inactive", ActivityStage::Dormant),
    ("spent", ActivityStage::Dormant),
    // Hyphenated canonical keys
    ("early-growth", ActivityStage::EarlyGrowth),
    ("late-decline", ActivityStage::LateDecline),
];

/// Look up an already-cleaned stage token.
pub fn lookup_stage_synonym(token: &str) -> Option<ActivityStage> {
    STAGE_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == token)
        .map(|(_, stage)| *stage)
}

// ============================================================================
// HEALTH STATUS
// ============================================================================

static HEALTH_EXCELLENT: HealthStatusDescriptor = HealthStatusDescriptor {
    text: "Excellent Health",
    color: "#10B981",
    chip: "Peak Activity",
    chip_color: "#10B981",
};

static HEALTH_VERY_GOOD: HealthStatusDescriptor = HealthStatusDescriptor {
    text: "Very Good Health",
    color: "#059669",
    chip: "Active",
    chip_color: "#059669",
};

static HEALTH_GOOD: HealthStatusDescriptor = HealthStatusDescriptor {
    text: "Good Health",
    color: "#F59E0B",
    chip: "Moderate Activity",
    chip_color: "#F59E0B",
};

static HEALTH_NEEDS_ATTENTION: HealthStatusDescriptor = HealthStatusDescriptor {
    text: "Needs Attention",
    color: "#EF4444",
    chip: "Low Activity",
    chip_color: "#EF4444",
};

static HEALTH_NEEDS_CARE: HealthStatusDescriptor = HealthStatusDescriptor {
    text: "Needs Care",
    color: "#DC2626",
    chip: "Critical",
    chip_color: "#DC2626",
};

/// Rating used when the model's rating is missing or out of range.
pub const DEFAULT_HEALTH_RATING: i64 = 3;

/// Exact table lookup; `None` outside 1-5.
pub fn lookup_health_status(rating: i64) -> Option<&'static HealthStatusDescriptor> {
    match rating {
        5 => Some(&HEALTH_EXCELLENT),
        4 => Some(&HEALTH_VERY_GOOD),
        3 => Some(&HEALTH_GOOD),
        2 => Some(&HEALTH_NEEDS_ATTENTION),
        1 => Some(&HEALTH_NEEDS_CARE),
        _ => None,
    }
}

/// Descriptor for [`DEFAULT_HEALTH_RATING`].
pub fn default_health_status() -> &'static HealthStatusDescriptor {
    &HEALTH_GOOD
}

// ============================================================================
// TESTS
// ============================================================================
