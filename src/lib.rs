//! Starter Sensei
//!
//! Sourdough starter tracking with photo diagnosis by a vision model.
//!
//! - `analysis/`: normalization of raw model output into a UI view-model
//! - `domain/`: starters, feedings, photo analyses, chat messages
//! - `store/`: repository trait and JSON key-value persistence
//! - `ai/`: prompts, response decoding, provider client
//! - `api_server`: Axum REST API (feature `api`)

pub mod ai;
pub mod analysis;
pub mod config;
pub mod domain;
pub mod errors;
pub mod store;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use analysis::{convert_ai_analysis_to_ui, RawAiAnalysis, UiAnalysisViewModel};
pub use config::ServerConfig;
pub use domain::{AnalysisContext, AnalysisRecord, HealthStatus, Starter};
pub use errors::{AiError, StoreError};
pub use store::{JsonFileStore, KeyValueStore, MemoryKv, StarterRepository, StarterStore};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
