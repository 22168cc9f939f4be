//! Vision/chat model integration
//!
//! - `prompt`: diagnostic and chat prompt text
//! - `response`: request bodies and reply decoding
//! - `chat`: conversation seeding from an analysis
//! - `provider`: the [`AnalysisProvider`] seam
//! - `client`: reqwest-backed provider (feature `api`)

pub mod chat;
pub mod prompt;
pub mod provider;
pub mod response;

#[cfg(feature = "api")]
pub mod client;

pub use chat::{analysis_chat_context, initial_assistant_message};
pub use prompt::{chat_system_prompt, diagnostic_prompt};
pub use provider::{resolve_api_key, AnalysisProvider};
pub use response::{chat_completion_content, extract_json_object, parse_analysis_content};

#[cfg(feature = "api")]
pub use client::OpenAiClient;
