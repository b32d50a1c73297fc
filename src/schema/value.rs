//! Typed values and records produced by validation

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};

/// A field value after coercion to its declared type
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent optional field with no default
    Null,
    /// UTF-8 string
    String(String),
    /// 64-bit signed integer
    Int(i64),
    /// Finite 64-bit floating point
    Decimal(f64),
    /// Boolean
    Bool(bool),
    /// Date/time with UTC offset, year 0000 through 9999
    Timestamp(DateTime<FixedOffset>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            FieldValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Numeric view used for range constraints
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Decimal(n) => Some(*n),
            _ => None,
        }
    }

    /// Converts to the JSON representation handed to the storage layer.
    ///
    /// Timestamps become RFC 3339 strings so that the output validates again unchanged.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(n) => Value::Number((*n).into()),
            FieldValue::Decimal(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A validated, fully-populated record.
///
/// Every field declared by the schema is present, in declaration order. Records are
/// immutable once built by the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRecord {
    schema: String,
    fields: Vec<(String, FieldValue)>,
}

impl TypedRecord {
    pub(crate) fn new(schema: impl Into<String>, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            schema: schema.into(),
            fields,
        }
    }

    /// Name of the schema this record was validated against
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Returns the value of a field, `None` if the schema does not declare it
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Iterates fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts into a raw record suitable for storage or re-validation
    pub fn into_raw(self) -> Map<String, Value> {
        self.fields
            .into_iter()
            .map(|(name, value)| {
                let json = value.to_json();
                (name, json)
            })
            .collect()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.clone().into_raw())
    }
}

impl Serialize for TypedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
