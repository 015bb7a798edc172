//! Typed values produced by conversion
//!
//! [`TypedValue`] is what application code works with after a raw document
//! has passed through a field tree: scalars, calendar dates, schema-ordered
//! mappings and sequences, plus opaque raw containers carried through by the
//! `RawDict`/`RawList` converters.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Canonical rendering for dates outside a date field
const ISO_DATE: &str = "%Y-%m-%d";

/// Application-level value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypedValue {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
    /// Calendar date without time of day
    Date(NaiveDate),
    /// Ordered sequence of typed values
    List(Vec<TypedValue>),
    /// Mapping from field name to typed value, in schema order
    Dict(IndexMap<String, TypedValue>),
    /// Opaque raw container passed through unchanged
    Raw(Value),
}

impl TypedValue {
    /// Check for null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as bool
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as integer
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Get as date
    #[inline]
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as mapping
    #[inline]
    #[must_use]
    pub fn as_dict(&self) -> Option<&IndexMap<String, TypedValue>> {
        match self {
            Self::Dict(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get as opaque raw container
    #[inline]
    #[must_use]
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }

    /// Look up a field of a mapping
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.as_dict().and_then(|fields| fields.get(name))
    }

    /// Structural conversion back to a raw value, without a schema
    ///
    /// Scalars map to their raw counterparts, dates render as ISO
    /// `YYYY-MM-DD`, containers recurse. Pass-through converters serialize
    /// through this.
    #[must_use]
    pub fn to_raw_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Int(value) => Value::from(*value),
            Self::Str(value) => Value::String(value.clone()),
            Self::Date(value) => Value::String(value.format(ISO_DATE).to_string()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_raw_value).collect()),
            Self::Dict(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_raw_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Raw(value) => value.clone(),
        }
    }

    /// Short name of the variant, for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "str",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Raw(_) => "raw",
        }
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<NaiveDate> for TypedValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<TypedValue>> for TypedValue {
    fn from(items: Vec<TypedValue>) -> Self {
        Self::List(items)
    }
}

impl From<IndexMap<String, TypedValue>> for TypedValue {
    fn from(fields: IndexMap<String, TypedValue>) -> Self {
        Self::Dict(fields)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_match_variants() {
        assert_eq!(TypedValue::from(5_i64).as_int(), Some(5));
        assert_eq!(TypedValue::from("x").as_str(), Some("x"));
        assert_eq!(TypedValue::from(true).as_bool(), Some(true));
        assert_eq!(TypedValue::from(5_i64).as_str(), None);
        assert!(TypedValue::from(None::<i64>).is_null());
    }

    #[test]
    fn dict_lookup() {
        let mut fields = IndexMap::new();
        fields.insert("title".to_string(), TypedValue::from("hello"));
        let value = TypedValue::from(fields);

        assert_eq!(value.get("title"), Some(&TypedValue::from("hello")));
        assert_eq!(value.get("missing"), None);
        assert_eq!(TypedValue::from(1_i64).get("title"), None);
    }

    #[test]
    fn structural_raw_value() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let mut fields = IndexMap::new();
        fields.insert("day".to_string(), TypedValue::from(date));
        fields.insert(
            "tags".to_string(),
            TypedValue::from(vec![TypedValue::from("a"), TypedValue::Null]),
        );
        fields.insert("meta".to_string(), TypedValue::Raw(json!({"k": 1.5})));

        assert_eq!(
            TypedValue::from(fields).to_raw_value(),
            json!({"day": "2020-01-02", "tags": ["a", null], "meta": {"k": 1.5}})
        );
    }
}
