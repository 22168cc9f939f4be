//! Server configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_IMAGE_MODEL: &str = "o3-2025-04-16";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-2024-11-20";
pub const DEFAULT_VIEW_CACHE_TTL_SECS: u64 = 300;

/// File inside `data_dir` holding the key-value store.
pub const STORE_FILE_NAME: &str = "starter_sensei.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    /// Overrides the key saved through the settings endpoint.
    pub api_key: Option<String>,
    pub api_url: String,
    pub image_model: String,
    pub chat_model: String,
    pub view_cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            port: DEFAULT_PORT,
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            view_cache_ttl: Duration::from_secs(DEFAULT_VIEW_CACHE_TTL_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source; unparsable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            data_dir: lookup("DATA_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            api_key: lookup("OPENAI_API_KEY")
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            api_url: text("OPENAI_API_URL", defaults.api_url),
            image_model: text("IMAGE_ANALYSIS_MODEL", defaults.image_model),
            chat_model: text("CHAT_MODEL", defaults.chat_model),
            view_cache_ttl: lookup("VIEW_CACHE_TTL_SECS")
                .and_then(|s| s.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.view_cache_ttl),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    /// Log settings without the key itself.
    pub fn log_summary(&self) {
        tracing::info!("Configuration:");
        tracing::info!("  DATA_DIR: {}", self.data_dir.display());
        tracing::info!("  PORT: {}", self.port);
        tracing::info!("  OPENAI_API_KEY: {}", if self.api_key.is_some() { "set" } else { "unset" });
        tracing::info!("  OPENAI_API_URL: {}", self.api_url);
        tracing::info!("  IMAGE_ANALYSIS_MODEL: {}", self.image_model);
        tracing::info!("  CHAT_MODEL: {}", self.chat_model);
        tracing::info!("  VIEW_CACHE_TTL_SECS: {}", self.view_cache_ttl.as_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.store_path(), PathBuf::from("data").join(STORE_FILE_NAME));
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("DATA_DIR", "/var/lib/sensei"),
            ("PORT", "8080"),
            ("OPENAI_API_KEY", " sk-live "),
            ("CHAT_MODEL", "gpt-4o-mini"),
            ("VIEW_CACHE_TTL_SECS", "60"),
        ]);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/sensei"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_key.as_deref(), Some("sk-live"));
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.view_cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let config = from_pairs(&[("PORT", "eighty"), ("VIEW_CACHE_TTL_SECS", "-1"), ("OPENAI_API_KEY", "")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.view_cache_ttl.as_secs(), DEFAULT_VIEW_CACHE_TTL_SECS);
        assert_eq!(config.api_key, None);
    }
}
