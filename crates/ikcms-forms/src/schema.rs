//! Declarative schema definitions
//!
//! Lets a field tree be described in JSON or YAML instead of code:
//!
//! ```yaml
//! name: article
//! type: dict
//! fields:
//!   - { name: title, type: str }
//!   - { name: published, type: date, format: "%Y-%m-%d" }
//!   - name: tags
//!     type: list
//!     item: { type: str }
//! ```

use crate::convs::Converter;
use crate::error::{SchemaError, SchemaResult};
use crate::field::{Field, ITEM_LABEL};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative description of a [`Field`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name; omitted for list items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Converter kind and its configuration
    #[serde(flatten)]
    pub kind: KindSpec,
}

/// Converter kind of a [`FieldSpec`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KindSpec {
    /// String
    Str,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Opaque mapping
    RawDict,
    /// Opaque sequence
    RawList,
    /// Date with a strftime-style format
    Date {
        /// Parse/render format
        format: String,
    },
    /// Object of named child fields
    Dict {
        /// Child fields
        #[serde(default)]
        fields: Vec<FieldSpec>,
    },
    /// Homogeneous array
    List {
        /// Unnamed item field
        #[serde(default, skip_serializing_if = "Option::is_none")]
        item: Option<Box<FieldSpec>>,
    },
}

impl FieldSpec {
    /// Parse a spec from JSON text
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        serde_json::from_str(text).map_err(|e| SchemaError::Definition(e.to_string()))
    }

    /// Parse a spec from YAML text
    pub fn from_yaml_str(text: &str) -> SchemaResult<Self> {
        serde_yaml::from_str(text).map_err(|e| SchemaError::Definition(e.to_string()))
    }

    /// Read a spec file, choosing JSON or YAML by extension
    ///
    /// `.json` is read as JSON; anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| SchemaError::io_error(path, e))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Build the field tree
    ///
    /// # Errors
    /// Any construction rule violated anywhere in the tree, e.g. a list
    /// without an item.
    pub fn build(&self) -> SchemaResult<Field> {
        let name = self.name.as_deref();

        let converter = match &self.kind {
            KindSpec::Str => Converter::Str,
            KindSpec::Int => Converter::Int,
            KindSpec::Bool => Converter::Bool,
            KindSpec::RawDict => Converter::RawDict,
            KindSpec::RawList => Converter::RawList,
            KindSpec::Date { format } => Converter::date(format.as_str()),
            KindSpec::Dict { fields } => Converter::dict(
                fields
                    .iter()
                    .map(FieldSpec::build)
                    .collect::<SchemaResult<Vec<_>>>()?,
            ),
            KindSpec::List { item } => {
                let item = item.as_deref().ok_or_else(|| {
                    SchemaError::MissingItemField(name.unwrap_or(ITEM_LABEL).to_string())
                })?;
                Converter::list(item.build()?)
            }
        };

        Field::new(name, converter)
    }
}
