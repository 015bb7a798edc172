//! Log output setup
//!
//! Installs a `tracing-subscriber` formatter writing to stderr. The filter
//! comes from `RUST_LOG` when set, otherwise from the configured level.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Fallback directive when the configured one does not parse
const DEFAULT_DIRECTIVE: &str = "info";

/// Build the filter for a configured directive
#[must_use]
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber
///
/// Returns `false` when a subscriber was already installed; the existing
/// one is kept.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = env_filter(&config.level);

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    };

    installed.is_ok()
}
