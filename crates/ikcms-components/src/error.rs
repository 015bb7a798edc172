//! Error types for components
//!
//! Provides error handling for:
//! - Cache operations (key checks, backend failures)
//! - Component registration into the environment

/// Errors during cache operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// Key rejected before reaching the backend
    #[error("invalid cache key '{key}': {reason}")]
    InvalidKey {
        /// Full key, prefix included
        key: String,
        /// Rule the key broke
        reason: &'static str,
    },

    /// Backend failed to serve the request
    #[error("cache backend error: {0}")]
    Backend(String),
}

impl CacheError {
    /// Create invalid key error
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }
}

/// Errors while wiring components
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// Two components registered under the same name
    #[error("component '{0}' is already registered")]
    Duplicate(String),
}

/// Result type alias for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Result type alias for component wiring
pub type ComponentResult<T> = Result<T, ComponentError>;
