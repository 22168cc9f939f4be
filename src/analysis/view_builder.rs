//! View Builder - Converts raw AI analysis to the UI view-model
//!
//! Absent (or blank) fields take these defaults before resolution:
//! - activity_stage: "peak"
//! - health_rating: "3"
//! - color_notes: "light-cream"
//! - bubble_density_score / rise_height_score: 5
//! - rise_height: "Moderate rise activity"
//!
//! Free-text description fields pass through unchanged.

use serde_json::Value;

use crate::analysis::types::{non_blank, parse_int_prefix, RawAiAnalysis};
use crate::analysis::utils::classify::{
    generate_bubble_pattern, generate_rise_chart_data, get_health_status, parse_activity_stage,
    parse_confidence, parse_starter_colors, resolve_score,
};
use crate::analysis::utils::lookup_tables::DEFAULT_HEALTH_RATING;
use crate::analysis::view_models::UiAnalysisViewModel;

const DEFAULT_ACTIVITY_STAGE: &str = "peak";
const DEFAULT_HEALTH_RATING_TEXT: &str = "3";
const DEFAULT_COLOR_NOTES: &str = "light-cream";
const DEFAULT_SCORE: i64 = 5;
const DEFAULT_RISE_DESCRIPTION: &str = "Moderate rise activity";

/// Build the complete view-model for one analysis.
pub fn convert_ai_analysis_to_ui(raw: &RawAiAnalysis) -> UiAnalysisViewModel {
    let stage = parse_activity_stage(
        non_blank(&raw.activity_stage).unwrap_or(DEFAULT_ACTIVITY_STAGE),
    );

    let rating_text = non_blank(&raw.health_rating).unwrap_or(DEFAULT_HEALTH_RATING_TEXT);
    let health_status = get_health_status(rating_text);
    let rating = parse_int_prefix(rating_text).unwrap_or(DEFAULT_HEALTH_RATING);

    let colors = parse_starter_colors(non_blank(&raw.color_notes).unwrap_or(DEFAULT_COLOR_NOTES));

    let bubble_score = resolve_score(non_blank(&raw.bubble_density_score), DEFAULT_SCORE);
    let rise_score = resolve_score(non_blank(&raw.rise_height_score), DEFAULT_SCORE);

    let rise_data = generate_rise_chart_data(
        rise_score,
        non_blank(&raw.rise_height).unwrap_or(DEFAULT_RISE_DESCRIPTION),
    );

    UiAnalysisViewModel {
        health_status: *health_status,
        rating,
        activity_stage: *stage.descriptor(),
        colors,
        bubble_pattern: generate_bubble_pattern(bubble_score),
        rise_data,
        confidence: parse_confidence(non_blank(&raw.confidence_pct)),
        rise_score,
        bubble_score,
        rise_description: raw.rise_height.clone(),
        bubble_description: raw.bubble_density.clone(),
        surface_description: raw.surface_texture.clone(),
        color_description: raw.color_notes.clone(),
        recommendation: raw.recommended_next_step.clone(),
        rationale: raw.rationale.clone(),
    }
}

/// Same as [`convert_ai_analysis_to_ui`] for an undecoded JSON payload.
pub fn convert_value_to_ui(value: &Value) -> UiAnalysisViewModel {
    convert_ai_analysis_to_ui(&RawAiAnalysis::from_value(value))
}
