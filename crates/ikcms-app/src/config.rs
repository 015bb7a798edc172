//! Application configuration
//!
//! Read from TOML; every section and key is optional:
//!
//! ```toml
//! [cache]
//! prefix = "site:"
//! max_capacity = 10000
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use crate::error::ConfigError;
use ikcms_components::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Cache component settings
    pub cache: CacheConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With cache settings
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// With logging settings
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&text)
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl LoggingConfig {
    /// With filter directive
    #[inline]
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// With JSON output
    #[inline]
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
