//! ikcms Forms
//!
//! Schema-driven conversion between raw decoded data (a `serde_json::Value`
//! tree) and typed application values, with validation errors aggregated
//! per field.
//!
//! # Core Concepts
//!
//! - [`Field`]: schema node naming a slot and owning its converter
//! - [`Converter`]: raw ⇄ typed transform (str, int, bool, date, dict, list,
//!   opaque raw containers)
//! - [`TypedValue`]: what application code works with
//! - [`ValidationError`]: failure tree mirroring the schema shape
//! - [`FieldSpec`]: declarative (JSON/YAML) schema description
//!
//! # Example
//!
//! ```rust
//! use ikcms_forms::{Converter, Field};
//! use serde_json::json;
//!
//! let days = Field::list("days", vec![Field::item(Converter::date("%Y-%m-%d"))?])?;
//!
//! let err = days
//!     .to_typed(&json!(["2020-01-01", "not-a-date", "2020-03-03"]))
//!     .unwrap_err();
//! assert_eq!(
//!     serde_json::to_value(err.validation().unwrap())?,
//!     json!([null, "Not a valid date", null])
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod convs;
pub mod error;
pub mod field;
pub mod schema;
pub mod value;

// Re-exports for convenience
pub use convs::Converter;
pub use error::{
    ConvError, ConvResult, RawKind, SchemaError, SchemaResult, ValidationError,
};
pub use field::Field;
pub use schema::{FieldSpec, KindSpec};
pub use value::TypedValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for defining schemas and converting values
    pub use crate::{ConvError, Converter, Field, FieldSpec, TypedValue, ValidationError};
}
