//! Schema fields
//!
//! A [`Field`] names a slot and owns the [`Converter`] for it. Composite
//! converters own their child fields outright, so a schema is a plain tree
//! built bottom-up and never mutated afterwards.

use crate::convs::Converter;
use crate::error::{ConvError, ConvResult, SchemaError, SchemaResult, ValidationError};
use crate::value::TypedValue;
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt::Write;

/// Label used for unnamed (list item) fields in messages
pub(crate) const ITEM_LABEL: &str = "<item>";

/// Schema node: an optional name plus the converter for its value
///
/// Unnamed fields are list items: their value is inline rather than a slot
/// of a parent mapping.
///
/// # Example
///
/// ```
/// use ikcms_forms::{Converter, Field};
/// use serde_json::json;
///
/// let schema = Field::dict("doc", vec![
///     Field::str("title"),
///     Field::list("days", vec![Field::item(Converter::date("%Y-%m-%d"))?])?,
/// ])?;
///
/// let typed = schema.to_typed(&json!({"title": "t", "days": ["2020-01-01"]}))?;
/// assert_eq!(typed.get("title").and_then(|v| v.as_str()), Some("t"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: Option<String>,
    converter: Converter,
}

impl Field {
    /// Create a field after checking the converter's construction rules
    ///
    /// # Errors
    /// - Dict children must be named and unique
    /// - List item must be unnamed
    /// - Date format must be able to parse and render a date
    pub fn new(name: Option<&str>, converter: Converter) -> SchemaResult<Self> {
        let label = name.unwrap_or(ITEM_LABEL);

        match &converter {
            Converter::Dict { fields } => check_children(label, fields)?,
            Converter::List { item } => {
                if let Some(item_name) = item.name() {
                    return Err(SchemaError::NamedItemField {
                        field: label.to_string(),
                        item: item_name.to_string(),
                    });
                }
            }
            Converter::Date { format } => {
                if !date_format_is_valid(format) {
                    return Err(SchemaError::InvalidDateFormat {
                        field: label.to_string(),
                        format: format.clone(),
                    });
                }
            }
            _ => {}
        }

        Ok(Self {
            name: name.map(str::to_owned),
            converter,
        })
    }

    /// Create an unnamed list item field
    #[inline]
    pub fn item(converter: Converter) -> SchemaResult<Self> {
        Self::new(None, converter)
    }

    fn scalar(name: &str, converter: Converter) -> Self {
        Self {
            name: Some(name.to_string()),
            converter,
        }
    }

    /// Named string field
    #[must_use]
    pub fn str(name: &str) -> Self {
        Self::scalar(name, Converter::Str)
    }

    /// Named integer field
    #[must_use]
    pub fn int(name: &str) -> Self {
        Self::scalar(name, Converter::Int)
    }

    /// Named boolean field
    #[must_use]
    pub fn bool(name: &str) -> Self {
        Self::scalar(name, Converter::Bool)
    }

    /// Named opaque mapping field
    #[must_use]
    pub fn raw_dict(name: &str) -> Self {
        Self::scalar(name, Converter::RawDict)
    }

    /// Named opaque sequence field
    #[must_use]
    pub fn raw_list(name: &str) -> Self {
        Self::scalar(name, Converter::RawList)
    }

    /// Named date field with a strftime-style format
    pub fn date(name: &str, format: &str) -> SchemaResult<Self> {
        Self::new(Some(name), Converter::date(format))
    }

    /// Named object field with child fields
    pub fn dict(name: &str, fields: Vec<Field>) -> SchemaResult<Self> {
        Self::new(Some(name), Converter::dict(fields))
    }

    /// Named list field
    ///
    /// `fields` must hold exactly one unnamed item field.
    ///
    /// # Errors
    /// Fails before any data is processed when the item field is missing,
    /// named, or accompanied by other children.
    pub fn list(name: &str, fields: Vec<Field>) -> SchemaResult<Self> {
        let count = fields.len();
        let mut fields = fields.into_iter();
        let item = fields
            .next()
            .ok_or_else(|| SchemaError::MissingItemField(name.to_string()))?;

        if let Some(item_name) = item.name() {
            return Err(SchemaError::NamedItemField {
                field: name.to_string(),
                item: item_name.to_string(),
            });
        }
        if count > 1 {
            return Err(SchemaError::ExtraItemFields {
                field: name.to_string(),
                count,
            });
        }

        Self::new(Some(name), Converter::list(item))
    }

    /// Field name (`None` for list items)
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for messages, `<item>` when unnamed
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(ITEM_LABEL)
    }

    /// The field's converter
    #[inline]
    #[must_use]
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Child fields: object fields for dicts, the item field for lists
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match &self.converter {
            Converter::Dict { fields } => fields,
            Converter::List { item } => std::slice::from_ref(item.as_ref()),
            _ => &[],
        }
    }

    /// Date format, for date fields
    #[must_use]
    pub fn format(&self) -> Option<&str> {
        match &self.converter {
            Converter::Date { format } => Some(format),
            _ => None,
        }
    }

    /// Convert a bare raw value
    ///
    /// # Errors
    /// [`ConvError::RawValueType`] when the value has the wrong shape for
    /// this field, [`ConvError::Validation`] when nested fields fail.
    #[inline]
    pub fn to_typed(&self, raw: &Value) -> ConvResult<TypedValue> {
        self.converter.to_typed(self.name(), raw)
    }

    /// Convert a typed value back to its raw form
    ///
    /// # Errors
    /// Only when the typed value does not fit a dict, list or date field.
    #[inline]
    pub fn to_raw(&self, value: &TypedValue) -> ConvResult<Value> {
        self.converter.to_raw(self.name(), value)
    }

    /// Convert this field's named slot of a raw mapping
    ///
    /// A missing key reads as null.
    pub fn slot_to_typed(&self, raw: &Map<String, Value>) -> ConvResult<TypedValue> {
        let value = raw.get(self.label()).unwrap_or(&Value::Null);
        self.to_typed(value)
    }

    /// Produce this field's named slot from a typed mapping
    ///
    /// A missing key serializes as null.
    pub fn slot_to_raw(&self, typed: &IndexMap<String, TypedValue>) -> ConvResult<Value> {
        match typed.get(self.label()) {
            Some(value) => self.to_raw(value),
            None => Ok(Value::Null),
        }
    }

    /// Fold a child conversion error into its parent's aggregated error
    ///
    /// Shape mismatches become this field's "not valid" message.
    pub(crate) fn fold_error(&self, error: ConvError) -> ValidationError {
        match error {
            ConvError::Validation(error) => error,
            ConvError::RawValueType { .. } => {
                ValidationError::message(self.converter.error_not_valid())
            }
            other => ValidationError::message(other.to_string()),
        }
    }
}

fn check_children(label: &str, fields: &[Field]) -> SchemaResult<()> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        let name = field
            .name()
            .ok_or_else(|| SchemaError::UnnamedChild(label.to_string()))?;
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateChild {
                field: label.to_string(),
                child: name.to_string(),
            });
        }
    }
    Ok(())
}

/// A usable date format parses cleanly and can render a date
fn date_format_is_valid(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let mut rendered = String::new();
    write!(rendered, "{}", NaiveDate::MIN.format(format)).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_requires_item_field() {
        let err = Field::list("tags", vec![]).unwrap_err();
        assert!(matches!(err, SchemaError::MissingItemField(ref name) if name == "tags"));
    }

    #[test]
    fn list_rejects_named_item() {
        let err = Field::list("tags", vec![Field::str("tag")]).unwrap_err();
        assert!(matches!(err, SchemaError::NamedItemField { .. }));
    }

    #[test]
    fn list_rejects_extra_children() {
        let err = Field::list(
            "tags",
            vec![
                Field::item(Converter::Str).unwrap(),
                Field::item(Converter::Int).unwrap(),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::ExtraItemFields { count: 2, .. }));
    }

    #[test]
    fn list_exposes_item_as_only_child() {
        let field = Field::list("tags", vec![Field::item(Converter::Str).unwrap()]).unwrap();
        assert_eq!(field.fields().len(), 1);
        assert_eq!(field.fields()[0].name(), None);
        assert_eq!(field.fields()[0].label(), "<item>");
    }

    #[test]
    fn dict_children_must_be_named_and_unique() {
        let unnamed = Field::dict("doc", vec![Field::item(Converter::Str).unwrap()]);
        assert!(matches!(unnamed, Err(SchemaError::UnnamedChild(_))));

        let duplicate = Field::dict("doc", vec![Field::str("a"), Field::int("a")]);
        assert!(matches!(
            duplicate,
            Err(SchemaError::DuplicateChild { ref child, .. }) if child == "a"
        ));
    }

    #[test]
    fn date_format_checked_at_construction() {
        assert!(Field::date("day", "%Y-%m-%d").is_ok());
        assert!(Field::date("day", "%d.%m.%Y").is_ok());
        assert!(matches!(
            Field::date("day", "%Q"),
            Err(SchemaError::InvalidDateFormat { .. })
        ));
        // Time of day cannot be rendered from a date
        assert!(Field::date("day", "%H:%M").is_err());
    }

    #[test]
    fn accessors() {
        let field = Field::date("day", "%Y-%m-%d").unwrap();
        assert_eq!(field.name(), Some("day"));
        assert_eq!(field.format(), Some("%Y-%m-%d"));
        assert!(field.fields().is_empty());
        assert_eq!(Field::str("title").format(), None);
    }
}
