//! Raw shapes a semi-structured field can arrive in.

use serde_json::{Map, Value};

/// A loosely-typed field value, decoded once at a persistence or API
/// boundary and handed to the normalizers.
///
/// JSON `null` and SQL `NULL` both map to [`RawField::Missing`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawField {
    /// No value was supplied.
    #[default]
    Missing,
    /// An already-decoded array.
    Sequence(Vec<Value>),
    /// An already-decoded object.
    Mapping(Map<String, Value>),
    /// Text that may or may not hold JSON.
    Text(String),
    /// A number or boolean.
    Scalar(Value),
}

impl From<Value> for RawField {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::Array(items) => Self::Sequence(items),
            Value::Object(map) => Self::Mapping(map),
            Value::String(text) => Self::Text(text),
            scalar => Self::Scalar(scalar),
        }
    }
}

impl From<Option<Value>> for RawField {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Missing, Self::from)
    }
}

impl From<String> for RawField {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RawField {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for RawField {
    fn from(items: Vec<String>) -> Self {
        Self::Sequence(items.into_iter().map(Value::String).collect())
    }
}

impl From<Map<String, Value>> for RawField {
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}
