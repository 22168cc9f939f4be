//! Starter persistence: repository trait, JSON-backed store, key-value adapters.

pub mod kv;
pub mod repository;
pub mod starter_store;

pub use kv::{JsonFileStore, KeyValueStore, MemoryKv};
pub use repository::StarterRepository;
pub use starter_store::{StarterStore, MAX_CHAT_MESSAGE_CHARS};
