//! ikcms Components
//!
//! Resource wrappers an application assembles once at startup and hands to
//! request handlers through an [`Environment`].
//!
//! # Example
//!
//! ```rust
//! use ikcms_components::{CacheComponent, CacheConfig, Environment};
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let mut env = Environment::new();
//! let cache = CacheComponent::create(&CacheConfig::new().with_prefix("site:"));
//! env.register(Arc::new(cache))?;
//!
//! let cache = env.cache().expect("registered above");
//! cache.set("greeting", json!("hello"), Duration::ZERO)?;
//! assert_eq!(cache.get("greeting")?, Some(json!("hello")));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod component;
pub mod error;

// Re-exports for convenience
pub use cache::{CacheClient, CacheComponent, CacheConfig, MemoryCacheClient};
pub use component::{Component, Environment};
pub use error::{CacheError, CacheResult, ComponentError, ComponentResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
