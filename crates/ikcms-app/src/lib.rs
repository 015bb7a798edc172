//! ikcms App
//!
//! Turns a configuration, a set of components, a handler and a root schema
//! into a running application, and ships the `ikcms` command line on top.
//!
//! # Example
//!
//! ```rust
//! use ikcms_app::{cache_component, App, AppConfig, AppDefinition, ComponentFactory};
//! use ikcms_app::{CachedValidateHandler, Handler};
//! use ikcms_forms::{Field, SchemaResult};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! struct Blog;
//!
//! impl AppDefinition for Blog {
//!     fn components(&self) -> Vec<ComponentFactory> {
//!         vec![cache_component]
//!     }
//!
//!     fn handler(&self) -> Box<dyn Handler> {
//!         Box::new(CachedValidateHandler::new(Duration::from_secs(60)))
//!     }
//!
//!     fn root(&self) -> SchemaResult<Field> {
//!         Field::dict("post", vec![Field::str("title"), Field::int("views")])
//!     }
//! }
//!
//! let app = App::new(AppConfig::default(), &Blog)?;
//! let answer = app.handle(&json!({"title": "Hi", "views": 2, "spam": true}))?;
//! assert_eq!(answer, json!({"title": "Hi", "views": 2}));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod logging;

// Re-exports for convenience
pub use app::{cache_component, App, AppDefinition, ComponentFactory};
pub use cli::SchemaApp;
pub use config::{AppConfig, LoggingConfig};
pub use error::{AppError, AppResult, ConfigError};
pub use handler::{CachedValidateHandler, Handler, ValidateHandler};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for defining applications
    pub use crate::{App, AppConfig, AppDefinition, AppError, Handler};
    pub use ikcms_forms::prelude::*;
}
