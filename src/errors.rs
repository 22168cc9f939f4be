//! Error types for the fallible layers (storage and AI provider).
//!
//! The normalization core in [`crate::analysis`] has no error type; it always
//! falls back to defaults.

use thiserror::Error;

/// Errors from the starter repository and its persistence adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound { entity, id: id.into() }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from talking to the chat-completion provider
#[derive(Debug, Error)]
pub enum AiError {
    #[error("No API key found. Please set your OpenAI API key in Settings.")]
    MissingApiKey,

    #[error("OpenAI API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("No response content from OpenAI")]
    EmptyContent,

    #[error("No JSON found in response")]
    NoJson,

    #[error("Failed to parse analysis result from AI: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to process image: {0}")]
    Image(String),
}

pub type AiResult<T> = Result<T, AiError>;
