//! Converters between raw and typed values
//!
//! Every converter follows the same contract:
//! - `null` maps to `null` in both directions and is never a type error
//! - a non-null raw value of the wrong shape fails with
//!   [`ConvError::RawValueType`]
//! - composite converters (dict, list) visit every child before failing and
//!   report one aggregated [`ValidationError`]
//! - serialization does not re-check raw shapes

use crate::error::{ConvError, ConvResult, RawKind, ValidationError};
use crate::field::Field;
use crate::value::TypedValue;
use chrono::format::{ParseResult, Parsed, StrftimeItems};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt::Write;

/// Raw ⇄ typed transform owned by a [`Field`]
#[derive(Debug, Clone, PartialEq)]
pub enum Converter {
    /// Opaque mapping, passed through unchanged
    RawDict,
    /// Opaque sequence, passed through unchanged
    RawList,
    /// String
    Str,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Object with named child fields
    Dict {
        /// Child fields, in declaration order
        fields: Vec<Field>,
    },
    /// Homogeneous array of one unnamed item field
    List {
        /// Item field
        item: Box<Field>,
    },
    /// String ⇄ calendar date with a strftime-style format
    Date {
        /// Format used for parsing and rendering
        format: String,
    },
}

impl Converter {
    /// Date converter for a format
    #[inline]
    pub fn date(format: impl Into<String>) -> Self {
        Self::Date {
            format: format.into(),
        }
    }

    /// Dict converter over child fields
    #[inline]
    #[must_use]
    pub fn dict(fields: Vec<Field>) -> Self {
        Self::Dict { fields }
    }

    /// List converter over an item field
    #[inline]
    #[must_use]
    pub fn list(item: Field) -> Self {
        Self::List {
            item: Box::new(item),
        }
    }

    /// Raw shape this converter accepts
    #[must_use]
    pub fn raw_kind(&self) -> RawKind {
        match self {
            Self::RawDict | Self::Dict { .. } => RawKind::Dict,
            Self::RawList | Self::List { .. } => RawKind::List,
            Self::Str | Self::Date { .. } => RawKind::Str,
            Self::Int => RawKind::Int,
            Self::Bool => RawKind::Bool,
        }
    }

    /// Message reported by an enclosing dict or list when this converter fails
    #[must_use]
    pub fn error_not_valid(&self) -> &'static str {
        match self {
            Self::RawDict | Self::Dict { .. } => "Not a valid dict",
            Self::RawList | Self::List { .. } => "Not a valid list",
            Self::Str => "Not a valid string",
            Self::Int => "Not a valid integer",
            Self::Bool => "Not a valid boolean",
            Self::Date { .. } => "Not a valid date",
        }
    }

    /// Short converter name, for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RawDict => "raw_dict",
            Self::RawList => "raw_list",
            Self::Str => "str",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Dict { .. } => "dict",
            Self::List { .. } => "list",
            Self::Date { .. } => "date",
        }
    }

    pub(crate) fn to_typed(&self, field: Option<&str>, raw: &Value) -> ConvResult<TypedValue> {
        match (self, raw) {
            (_, Value::Null) => Ok(TypedValue::Null),
            (Self::Str, Value::String(value)) => Ok(TypedValue::Str(value.clone())),
            (Self::Int, Value::Number(number)) => number
                .as_i64()
                .map(TypedValue::Int)
                .ok_or_else(|| self.type_error(field)),
            (Self::Bool, Value::Bool(value)) => Ok(TypedValue::Bool(*value)),
            (Self::RawDict, Value::Object(_)) | (Self::RawList, Value::Array(_)) => {
                Ok(TypedValue::Raw(raw.clone()))
            }
            (Self::Dict { fields }, Value::Object(map)) => dict_to_typed(fields, map),
            (Self::List { item }, Value::Array(items)) => list_to_typed(item, items),
            (Self::Date { format }, Value::String(value)) => {
                parse_date(field, format, value, self.error_not_valid())
            }
            _ => Err(self.type_error(field)),
        }
    }

    pub(crate) fn to_raw(&self, field: Option<&str>, value: &TypedValue) -> ConvResult<Value> {
        match (self, value) {
            (_, TypedValue::Null) => Ok(Value::Null),
            (Self::Dict { fields }, TypedValue::Dict(typed)) => dict_to_raw(fields, typed),
            (Self::List { item }, TypedValue::List(items)) => items
                .iter()
                .map(|value| item.to_raw(value))
                .collect::<ConvResult<Vec<_>>>()
                .map(Value::Array),
            (Self::Date { format }, TypedValue::Date(date)) => render_date(field, format, *date),
            (Self::Dict { .. } | Self::List { .. } | Self::Date { .. }, _) => {
                Err(ConvError::TypedValueType {
                    expected: self.kind(),
                    field: field.map(str::to_owned),
                })
            }
            (_, value) => Ok(value.to_raw_value()),
        }
    }

    fn type_error(&self, field: Option<&str>) -> ConvError {
        let expected = self.raw_kind();
        tracing::debug!(
            field = field.unwrap_or(crate::field::ITEM_LABEL),
            expected = %expected,
            "raw value type mismatch"
        );
        ConvError::RawValueType {
            expected,
            field: field.map(str::to_owned),
        }
    }
}

fn dict_to_typed(fields: &[Field], raw: &Map<String, Value>) -> ConvResult<TypedValue> {
    let mut typed = IndexMap::with_capacity(fields.len());
    let mut errors = IndexMap::new();

    for field in fields {
        match field.slot_to_typed(raw) {
            Ok(value) => {
                typed.insert(field.label().to_string(), value);
            }
            Err(error) => {
                errors.insert(field.label().to_string(), field.fold_error(error));
            }
        }
    }

    if errors.is_empty() {
        Ok(TypedValue::Dict(typed))
    } else {
        Err(ValidationError::Fields(errors).into())
    }
}

fn dict_to_raw(fields: &[Field], typed: &IndexMap<String, TypedValue>) -> ConvResult<Value> {
    let mut raw = Map::new();
    for field in fields {
        raw.insert(field.label().to_string(), field.slot_to_raw(typed)?);
    }
    Ok(Value::Object(raw))
}

fn list_to_typed(item: &Field, raw: &[Value]) -> ConvResult<TypedValue> {
    let mut typed = Vec::with_capacity(raw.len());
    let mut errors = Vec::with_capacity(raw.len());
    let mut failed = false;

    for value in raw {
        match item.to_typed(value) {
            Ok(value) => {
                typed.push(value);
                errors.push(None);
            }
            Err(error) => {
                failed = true;
                errors.push(Some(item.fold_error(error)));
            }
        }
    }

    if failed {
        Err(ValidationError::Items(errors).into())
    } else {
        Ok(TypedValue::List(typed))
    }
}

fn parse_date(
    field: Option<&str>,
    format: &str,
    raw: &str,
    not_valid: &str,
) -> ConvResult<TypedValue> {
    parse_naive_date(raw, format)
        .map(TypedValue::Date)
        .map_err(|error| {
            tracing::debug!(
                field = field.unwrap_or(crate::field::ITEM_LABEL),
                format,
                %error,
                "date parse failed"
            );
            ValidationError::message(not_valid).into()
        })
}

/// Parse a date, filling components the format leaves out
///
/// Missing year, month and day default to 1900, January and the 1st, so
/// `%Y` accepts `2020` and `%m-%d` accepts `03-04`. Components the input
/// does set are never overridden.
fn parse_naive_date(raw: &str, format: &str) -> ParseResult<NaiveDate> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, raw, StrftimeItems::new(format))?;

    parsed.to_naive_date().or_else(|_| {
        // Setters refuse to replace a value already parsed
        let _ = parsed.set_year(1900);
        let _ = parsed.set_month(1);
        let _ = parsed.set_day(1);
        parsed.to_naive_date()
    })
}

fn render_date(field: Option<&str>, format: &str, date: NaiveDate) -> ConvResult<Value> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format)).map_err(|_| ConvError::DateFormat {
        field: field.map(str::to_owned),
        format: format.to_string(),
    })?;
    Ok(Value::String(rendered))
}
