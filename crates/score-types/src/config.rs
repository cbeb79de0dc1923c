//! Configuration loading for nutriscore.
//!
//! Layered precedence: built-in defaults -> config file
//! (~/.config/nutriscore/config.toml) -> environment variables
//! (NUTRISCORE_*). API keys are only ever read from the environment.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ScoreError;

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// API base URL (e.g., "https://api.openai.com/v1")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API key (loaded from env var, not stored in config file)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ProviderSettings {
    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_embedding_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Key-value store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Retention window for cached embeddings, in seconds (default 7 days)
    #[serde(default = "default_embedding_ttl_secs")]
    pub embedding_ttl_secs: u64,

    /// Retention window for persisted scores, in seconds (default 24 hours)
    #[serde(default = "default_score_ttl_secs")]
    pub score_ttl_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            embedding_ttl_secs: default_embedding_ttl_secs(),
            score_ttl_secs: default_score_ttl_secs(),
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Embedding provider settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Key-value store settings
    #[serde(default)]
    pub store: StoreSettings,

    /// Cosine similarity threshold for a semantic keyword match.
    /// Range: 0.0-1.0, higher = stricter.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_embedding_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_score_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_similarity_threshold() -> f32 {
    0.7
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings::default(),
            store: StoreSettings::default(),
            similarity_threshold: default_similarity_threshold(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/nutriscore/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (NUTRISCORE_*)
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ScoreError> {
        let config_dir = ProjectDirs::from("", "", "nutriscore")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Format: NUTRISCORE_PROVIDER_MODEL, NUTRISCORE_STORE_REDIS_URL, etc.
        builder = builder.add_source(
            Environment::with_prefix("NUTRISCORE")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ScoreError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| ScoreError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ScoreError::Config(format!(
                "similarity_threshold must be 0.0-1.0, got {}",
                self.similarity_threshold
            )));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ScoreError::Config(
                "provider.timeout_secs must be > 0".to_string(),
            ));
        }
        if self.store.embedding_ttl_secs == 0 || self.store.score_ttl_secs == 0 {
            return Err(ScoreError::Config(
                "store TTLs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
