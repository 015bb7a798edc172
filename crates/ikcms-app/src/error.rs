//! Error types for the application layer
//!
//! Provides error handling for:
//! - Configuration loading
//! - Component creation and wiring
//! - Schema construction
//! - Request handling (conversion and cache failures)

use ikcms_components::{CacheError, ComponentError};
use ikcms_forms::{ConvError, SchemaError, ValidationError};
use std::path::PathBuf;

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`crate::AppConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Component wiring failed
    #[error("component error: {0}")]
    Component(#[from] ComponentError),

    /// Root schema could not be built
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Request did not convert
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConvError),

    /// Cache operation failed while handling a request
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// Handler needs a component that is not registered
    #[error("component '{0}' is not registered")]
    MissingComponent(&'static str),
}

impl AppError {
    /// Aggregated validation error, if the request failed validation
    #[inline]
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Conversion(error) => error.validation(),
            _ => None,
        }
    }

    /// Check if the request itself was at fault
    #[inline]
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Conversion(_))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_exposed() {
        let err: AppError = ConvError::Validation(ValidationError::message("Not a valid date")).into();
        assert!(err.is_client_error());
        assert_eq!(err.validation(), Some(&ValidationError::message("Not a valid date")));
    }

    #[test]
    fn missing_component_display() {
        let err = AppError::MissingComponent("cache");
        assert_eq!(err.to_string(), "component 'cache' is not registered");
        assert!(!err.is_client_error());
        assert!(err.validation().is_none());
    }
}
