//! Classification functions for starter analysis.
//!
//! Each resolver is total: any input, including garbage, maps to a fully
//! populated result. Fallbacks are logged at debug level and never fail.

use std::fmt;

use smallvec::smallvec;

use crate::analysis::types::{first_digit_run, parse_int_prefix};
use crate::analysis::utils::lookup_tables::{
    color_lexicon, default_health_status, lookup_health_status, lookup_stage_synonym,
    DEFAULT_CREAM_COLORS, FALLBACK_PALETTE, MAX_PALETTE_COLORS,
};
use crate::analysis::view_models::{
    ActivityStage, BubblePatternDescriptor, BubblePatternKind, HealthStatusDescriptor, RiseCurve,
};

// ============================================================================
// Color Palette
// ============================================================================

/// Map free-text color notes to 1-3 hex colors.
///
/// Keywords are tested as substrings in lexicon order, so `"light-cream"` also
/// matches `"cream"`. Duplicated hex values are kept. An empty match seeds the
/// default cream pair, and short palettes are padded from [`FALLBACK_PALETTE`].
pub fn parse_starter_colors(color_notes: &str) -> Vec<&'static str> {
    let notes = color_notes.to_lowercase();

    let mut colors: Vec<&'static str> = color_lexicon()
        .iter()
        .filter(|t| notes.contains(t.keyword))
        .map(|t| t.hex)
        .collect();

    if colors.is_empty() {
        colors.extend(DEFAULT_CREAM_COLORS);
    }

    for hex in FALLBACK_PALETTE {
        if colors.len() >= MAX_PALETTE_COLORS {
            break;
        }
        if !colors.contains(&hex) {
            colors.push(hex);
        }
    }

    colors.truncate(MAX_PALETTE_COLORS);
    colors
}

// ============================================================================
// Bubble Pattern
// ============================================================================

/// Bucket a bubble density score into a drawable pattern.
/// - <= 3: sparse
/// - 4-6: moderate
/// - >= 7: dense
pub fn generate_bubble_pattern(density_score: i64) -> BubblePatternDescriptor {
    match density_score {
        i64::MIN..=3 => BubblePatternDescriptor {
            count: 3,
            sizes: smallvec![8, 6, 4],
            pattern: BubblePatternKind::Sparse,
            description: "Few scattered bubbles",
        },
        4..=6 => BubblePatternDescriptor {
            count: 6,
            sizes: smallvec![10, 8, 6, 8, 5, 7],
            pattern: BubblePatternKind::Moderate,
            description: "Moderate bubble formation",
        },
        _ => BubblePatternDescriptor {
            count: 8,
            sizes: smallvec![12, 8, 10, 6, 9, 7, 5, 8],
            pattern: BubblePatternKind::Dense,
            description: "High bubble density",
        },
    }
}

// ============================================================================
// Rise Curve
// ============================================================================

/// Height of the jar scale the curve is drawn against.
pub const RISE_BASE_HEIGHT: f64 = 10.0;

/// Synthesize a 5-point rise curve from a 0-10 score and the model's prose.
///
/// Qualifiers are applied in a fixed order: "tripled" raises the multiplier
/// to at least 0.9, then "doubled" to at least 0.7, then "minimal"/"slight"
/// caps it at 0.3. The cap runs last and wins when qualifiers conflict.
pub fn generate_rise_chart_data(rise_score: i64, description: &str) -> RiseCurve {
    let text = description.to_lowercase();
    let mut multiplier = rise_score as f64 / 10.0;

    if text.contains("tripled") {
        multiplier = multiplier.max(0.9);
    }
    if text.contains("doubled") {
        multiplier = multiplier.max(0.7);
    }
    if text.contains("minimal") || text.contains("slight") {
        multiplier = multiplier.min(0.3);
    }

    [
        RISE_BASE_HEIGHT * 0.3,
        RISE_BASE_HEIGHT * 0.5,
        RISE_BASE_HEIGHT * 0.4,
        RISE_BASE_HEIGHT * multiplier,
        RISE_BASE_HEIGHT * (multiplier * 0.9),
    ]
}

// ============================================================================
// Activity Stage
// ============================================================================

/// Lowercase and keep only `a-z` and `-`.
pub fn clean_stage_token(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == '-')
        .collect()
}

/// Resolve a free-text stage label to a canonical stage, defaulting to peak.
pub fn parse_activity_stage(activity_stage: &str) -> ActivityStage {
    let token = clean_stage_token(activity_stage);
    lookup_stage_synonym(&token).unwrap_or_else(|| {
        tracing::debug!("Unrecognized activity stage {:?}, using peak", activity_stage);
        ActivityStage::Peak
    })
}

// ============================================================================
// Health Status
// ============================================================================

/// Health descriptor for a rating given as text or number.
/// Anything that does not parse to 1-5 resolves to the rating-3 entry.
pub fn get_health_status<T: fmt::Display>(rating: T) -> &'static HealthStatusDescriptor {
    let text = rating.to_string();
    match parse_int_prefix(&text).and_then(lookup_health_status) {
        Some(status) => status,
        None => {
            tracing::debug!("Health rating {:?} outside 1-5, using default", text);
            default_health_status()
        }
    }
}

// ============================================================================
// Confidence
// ============================================================================

/// Confidence reported when the model gives none.
pub const DEFAULT_CONFIDENCE: u8 = 75;

/// Pull a percentage out of loosely formatted confidence text.
///
/// Takes the first run of digits (`"about 85 percent"` -> 85), clamped to 100.
/// Absent input or text without digits yields [`DEFAULT_CONFIDENCE`].
pub fn parse_confidence<T: fmt::Display>(confidence: Option<T>) -> u8 {
    let Some(value) = confidence else {
        return DEFAULT_CONFIDENCE;
    };

    let text = value.to_string();
    match first_digit_run(&text) {
        Some(digits) => digits
            .parse::<u64>()
            .map(|n| n.min(100) as u8)
            .unwrap_or(100), // run too long for u64 is far above 100 anyway
        None => DEFAULT_CONFIDENCE,
    }
}

// ============================================================================
// Scores
// ============================================================================

/// Resolve a 0-10 score field. Absent -> `default`; present but unparsable -> 0.
pub fn resolve_score(field: Option<&str>, default: i64) -> i64 {
    match field {
        None => default,
        Some(text) => parse_int_prefix(text).unwrap_or_else(|| {
            tracing::debug!("Unparsable score {:?}, using 0", text);
            0
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_curve(actual: RiseCurve, expected: [f64; 5]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *e, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_colors_keep_lexicon_order() {
        // "light-cream" also contains "cream"; "beige" shares cream's hex
        let colors = parse_starter_colors("light-cream and beige tones");
        assert_eq!(colors, vec!["#FFF8DC", "#F5F5DC", "#F5F5DC"]);
    }

    #[test]
    fn test_colors_pad_short_palette() {
        // beige precedes tan in the lexicon regardless of input order
        let colors = parse_starter_colors("Tan and BEIGE");
        assert_eq!(colors, vec!["#F5F5DC", "#D2B48C", "#FAF0E6"]);
    }

    #[test]
    fn test_colors_default_when_nothing_matches() {
        assert_eq!(
            parse_starter_colors("indescribable"),
            vec!["#FFF8DC", "#F5F5DC", "#FAF0E6"]
        );
        assert_eq!(parse_starter_colors(""), vec!["#FFF8DC", "#F5F5DC", "#FAF0E6"]);
    }

    #[test]
    fn test_colors_truncate_to_three() {
        let colors = parse_starter_colors("ivory, pearl, golden, caramel and bluish streaks");
        assert_eq!(colors, vec!["#FFFFF0", "#F8F6F0", "#FFD700"]);
    }

    #[test]
    fn test_colors_length_bounds() {
        for notes in ["", "gray", "pink-tinted", "cream uniform", "wheat-brown crust", "???"] {
            let colors = parse_starter_colors(notes);
            assert!(!colors.is_empty() && colors.len() <= 3, "{:?} -> {:?}", notes, colors);
        }
    }

    #[test]
    fn test_bubble_boundaries() {
        assert_eq!(generate_bubble_pattern(3).pattern, BubblePatternKind::Sparse);
        assert_eq!(generate_bubble_pattern(4).pattern, BubblePatternKind::Moderate);
        assert_eq!(generate_bubble_pattern(6).pattern, BubblePatternKind::Moderate);
        assert_eq!(generate_bubble_pattern(7).pattern, BubblePatternKind::Dense);
        assert_eq!(generate_bubble_pattern(-5).count, 3);
        assert_eq!(generate_bubble_pattern(100).count, 8);
    }

    #[test]
    fn test_bubble_sizes_match_count() {
        for score in 0..=10 {
            let pattern = generate_bubble_pattern(score);
            assert_eq!(pattern.sizes.len(), pattern.count as usize);
        }
    }

    #[test]
    fn test_rise_tripled() {
        let curve = generate_rise_chart_data(10, "fully tripled in size");
        assert_curve(curve, [3.0, 5.0, 4.0, 10.0, 9.0]);

        let curve = generate_rise_chart_data(2, "Tripled overnight");
        assert_curve(curve, [3.0, 5.0, 4.0, 9.0, 8.1]);
    }

    #[test]
    fn test_rise_doubled_and_plain() {
        assert_curve(generate_rise_chart_data(5, "just doubled"), [3.0, 5.0, 4.0, 7.0, 6.3]);
        assert_curve(generate_rise_chart_data(5, "moderate"), [3.0, 5.0, 4.0, 5.0, 4.5]);
    }

    #[test]
    fn test_rise_minimal_wins_over_tripled() {
        let curve = generate_rise_chart_data(10, "minimal rise, not tripled");
        assert_curve(curve, [3.0, 5.0, 4.0, 3.0, 2.7]);

        let curve = generate_rise_chart_data(8, "Slight doming");
        assert_relative_eq!(curve[3], 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_stage_cleaning() {
        assert_eq!(clean_stage_token("Peak Activity!!"), "peakactivity");
        assert_eq!(clean_stage_token("Early-Growth #2"), "early-growth");
    }

    #[test]
    fn test_stage_resolution() {
        assert_eq!(parse_activity_stage("Peak Activity!!"), ActivityStage::Peak);
        assert_eq!(parse_activity_stage("Lag Phase"), ActivityStage::Lag);
        assert_eq!(parse_activity_stage("early growth"), ActivityStage::EarlyGrowth);
        assert_eq!(parse_activity_stage("late-decline"), ActivityStage::LateDecline);
        assert_eq!(parse_activity_stage("Falling"), ActivityStage::LateDecline);
        assert_eq!(parse_activity_stage("INACTIVE"), ActivityStage::Dormant);
        assert_eq!(parse_activity_stage("gibberish"), ActivityStage::Peak);
        assert_eq!(parse_activity_stage(""), ActivityStage::Peak);
    }

    #[test]
    fn test_health_status_exact_ratings() {
        assert_eq!(get_health_status(5).text, "Excellent Health");
        assert_eq!(get_health_status("4").text, "Very Good Health");
        assert_eq!(get_health_status("3").text, "Good Health");
        assert_eq!(get_health_status(2).text, "Needs Attention");
        assert_eq!(get_health_status("1").text, "Needs Care");
        assert_eq!(get_health_status("4/5").text, "Very Good Health");
        assert_eq!(get_health_status(4.8).text, "Very Good Health");
    }

    #[test]
    fn test_health_status_fallback() {
        for rating in ["0", "6", "excellent", "", "-1"] {
            assert_eq!(get_health_status(rating), default_health_status(), "{:?}", rating);
        }
        assert_eq!(get_health_status(0), default_health_status());
    }

    #[test]
    fn test_confidence() {
        assert_eq!(parse_confidence(Some("85%")), 85);
        assert_eq!(parse_confidence(Some("about 85 percent confident")), 85);
        assert_eq!(parse_confidence(None::<&str>), 75);
        assert_eq!(parse_confidence(Some("no number here")), 75);
        assert_eq!(parse_confidence(Some(42)), 42);
        assert_eq!(parse_confidence(Some("")), 75);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(parse_confidence(Some("150%")), 100);
        assert_eq!(parse_confidence(Some("123456789012345678901234567890")), 100);
    }

    #[test]
    fn test_resolve_score() {
        assert_eq!(resolve_score(None, 5), 5);
        assert_eq!(resolve_score(Some("8"), 5), 8);
        assert_eq!(resolve_score(Some("7 out of 10"), 5), 7);
        assert_eq!(resolve_score(Some("lots"), 5), 0);
    }
}
