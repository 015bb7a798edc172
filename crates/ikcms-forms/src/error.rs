//! Error types for the forms layer
//!
//! Provides error handling for:
//! - Raw shape mismatches detected by a converter's type check
//! - Aggregated validation failures mirroring the schema shape
//! - Schema construction mistakes (caught before any data is processed)

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Raw value shapes a converter can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    /// Mapping from string key to raw value
    Dict,
    /// Ordered sequence of raw values
    List,
    /// UTF-8 string
    Str,
    /// Integer (floating point numbers never match)
    Int,
    /// Boolean
    Bool,
}

impl RawKind {
    /// Returns the shape name used in error messages
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dict => "dict",
            Self::List => "list",
            Self::Str => "string",
            Self::Int => "integer",
            Self::Bool => "boolean",
        }
    }

    /// Check whether a non-null raw value has this shape
    #[must_use]
    pub fn matches(&self, raw: &Value) -> bool {
        match self {
            Self::Dict => raw.is_object(),
            Self::List => raw.is_array(),
            Self::Str => raw.is_string(),
            Self::Int => raw.is_i64(),
            Self::Bool => raw.is_boolean(),
        }
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated validation failure
///
/// Mirrors the shape of the schema that produced it: a leaf message, a
/// mapping of failing object fields, or a list aligned with the input items
/// where `None` marks an item that converted cleanly.
///
/// Serializes to the natural JSON shape (`"msg"`, `{"a": ...}`,
/// `[null, "msg", null]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(untagged)]
pub enum ValidationError {
    /// Single failure message for a leaf field
    #[error("{0}")]
    Message(String),

    /// Failures of an object's fields, keyed by field name
    #[error("invalid fields: {}", join_keys(.0))]
    Fields(IndexMap<String, ValidationError>),

    /// Failures of a list's items, aligned with the input items
    #[error("invalid items at positions {}", failed_positions(.0))]
    Items(Vec<Option<ValidationError>>),
}

impl ValidationError {
    /// Create a leaf error
    #[inline]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Error for a named field, if the field failed
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ValidationError> {
        match self {
            Self::Fields(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Error for a list item, if the item failed
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&ValidationError> {
        match self {
            Self::Items(items) => items.get(index).and_then(Option::as_ref),
            _ => None,
        }
    }

    /// Flatten into `(path, message)` pairs, one per failing leaf
    ///
    /// Paths use `.` between object fields and `[i]` for list items, e.g.
    /// `authors[1].name`. A top-level leaf has an empty path.
    #[must_use]
    pub fn leaves(&self) -> Vec<(String, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(String::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: String, out: &mut Vec<(String, &'a str)>) {
        match self {
            Self::Message(message) => out.push((path, message)),
            Self::Fields(fields) => {
                for (name, error) in fields {
                    let child = if path.is_empty() {
                        name.clone()
                    } else {
                        format!("{path}.{name}")
                    };
                    error.collect_leaves(child, out);
                }
            }
            Self::Items(items) => {
                for (index, error) in items.iter().enumerate() {
                    if let Some(error) = error {
                        error.collect_leaves(format!("{path}[{index}]"), out);
                    }
                }
            }
        }
    }
}

fn join_keys(fields: &IndexMap<String, ValidationError>) -> String {
    fields.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn failed_positions(items: &[Option<ValidationError>]) -> String {
    items
        .iter()
        .enumerate()
        .filter(|(_, error)| error.is_some())
        .map(|(index, _)| index.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_label(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("<item>")
}

/// Errors from a single conversion call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvError {
    /// Non-null raw value does not have the converter's expected shape
    #[error("field '{}': expected a raw {expected} value", field_label(.field))]
    RawValueType {
        /// Shape the converter requires
        expected: RawKind,
        /// Field name (`None` for list items)
        field: Option<String>,
    },

    /// One or more fields failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Typed value handed to serialization does not fit the field
    #[error("field '{}': typed value does not fit a {expected} field", field_label(.field))]
    TypedValueType {
        /// Converter kind that rejected the value
        expected: &'static str,
        /// Field name (`None` for list items)
        field: Option<String>,
    },

    /// Date could not be rendered with the field's format
    #[error("field '{}': date cannot be rendered with format '{format}'", field_label(.field))]
    DateFormat {
        /// Field name (`None` for list items)
        field: Option<String>,
        /// Configured format
        format: String,
    },
}

impl ConvError {
    /// Aggregated validation error, if this is one
    #[inline]
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(error) => Some(error),
            _ => None,
        }
    }

    /// Check if this is a raw shape mismatch
    #[inline]
    #[must_use]
    pub fn is_raw_type_error(&self) -> bool {
        matches!(self, Self::RawValueType { .. })
    }
}

/// Errors while building a schema
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// List field declared without an item field
    #[error("list field '{0}' declares no item field")]
    MissingItemField(String),

    /// List item field carries a name
    #[error("list field '{field}': item field must be unnamed, got '{item}'")]
    NamedItemField {
        /// List field name
        field: String,
        /// Name found on the item field
        item: String,
    },

    /// List field declared with more than one child
    #[error("list field '{field}' declares {count} child fields, expected exactly one")]
    ExtraItemFields {
        /// List field name
        field: String,
        /// Number of children declared
        count: usize,
    },

    /// Dict child field without a name
    #[error("dict field '{0}' contains an unnamed child field")]
    UnnamedChild(String),

    /// Dict child name used twice
    #[error("dict field '{field}' declares '{child}' more than once")]
    DuplicateChild {
        /// Dict field name
        field: String,
        /// Repeated child name
        child: String,
    },

    /// Date format that cannot parse or render dates
    #[error("date field '{field}': invalid format '{format}'")]
    InvalidDateFormat {
        /// Date field name
        field: String,
        /// Rejected format
        format: String,
    },

    /// Declarative schema text could not be decoded
    #[error("schema definition error: {0}")]
    Definition(String),

    /// IO error reading a schema file
    #[error("io error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for conversions
pub type ConvResult<T> = Result<T, ConvError>;

/// Result type alias for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;
