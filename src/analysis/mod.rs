//! Starter Analysis Normalization
//!
//! Turns the loosely structured JSON a vision model returns into a fixed-shape
//! view-model the UI can render without further checks.
//!
//! ## Resolvers
//! 1. Color palette - color notes -> 1-3 hex values
//! 2. Bubble pattern - density score -> sparse / moderate / dense
//! 3. Rise curve - rise score + qualifiers -> 5-point series
//! 4. Activity stage - free-text stage -> canonical stage descriptor
//! 5. Health status - 1-5 rating -> status descriptor
//! 6. Confidence - percentage buried in text -> 0-100
//!
//! [`convert_ai_analysis_to_ui`] composes all of them. Every resolver is a
//! pure, total function.

pub mod types;
pub mod utils;
pub mod view_builder;
pub mod view_models;

pub use types::RawAiAnalysis;
pub use view_builder::convert_ai_analysis_to_ui;
pub use view_models::*;
