//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - decimal: 64-bit floating point
//! - bool: Boolean
//! - timestamp: date/time with offset, parsed from ISO 8601

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use super::coerce::coerce;
use super::naming::collection_name;

/// Supported semantic field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Decimal,
    /// Boolean
    Bool,
    /// Date/time with UTC offset
    Timestamp,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
        }
    }

    /// Whether range constraints apply to this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Decimal)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Inclusive numeric range constraint.
///
/// Serialized as `{"ge": 0}` / `{"le": 10}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Constraint {
    /// Value must be greater than or equal to the bound
    Ge(f64),
    /// Value must be less than or equal to the bound
    Le(f64),
}

impl Constraint {
    /// Returns true if `value` satisfies the constraint
    pub fn check(&self, value: f64) -> bool {
        match *self {
            Constraint::Ge(bound) => value >= bound,
            Constraint::Le(bound) => value <= bound,
        }
    }

    /// Human-readable description of a violation
    pub fn violation_message(&self) -> String {
        match self {
            Constraint::Ge(bound) => format!("must be greater than or equal to {}", bound),
            Constraint::Le(bound) => format!("must be less than or equal to {}", bound),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Ge(bound) => write!(f, "ge={}", bound),
            Constraint::Le(bound) => write!(f, "le={}", bound),
        }
    }
}

/// A single entry of a schema's rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as it appears in raw records
    pub name: String,
    /// Semantic type the raw value is coerced to
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether field must be present and non-null
    #[serde(default)]
    pub required: bool,
    /// Raw default applied when an optional field is absent; `None` means null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Range constraints, numeric fields only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Create an optional field that defaults to null
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    /// Create an optional field with a default value
    pub fn with_default(name: impl Into<String>, field_type: FieldType, default: Value) -> Self {
        Self {
            default: Some(default),
            ..Self::optional(name, field_type)
        }
    }

    /// Adds a `ge` constraint
    pub fn ge(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Ge(bound));
        self
    }

    /// Adds an `le` constraint
    pub fn le(mut self, bound: f64) -> Self {
        self.constraints.push(Constraint::Le(bound));
        self
    }

    /// Attaches a description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks this definition on its own, outside any document
    fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("field name must not be empty".into());
        }

        if self.required && self.default.is_some() {
            return Err(format!("required field '{}' cannot declare a default", self.name));
        }

        if !self.constraints.is_empty() && !self.field_type.is_numeric() {
            return Err(format!(
                "field '{}' of type {} cannot carry range constraints",
                self.name, self.field_type
            ));
        }

        let lower = self.constraints.iter().filter_map(|c| match c {
            Constraint::Ge(b) => Some(*b),
            Constraint::Le(_) => None,
        });
        let upper = self.constraints.iter().filter_map(|c| match c {
            Constraint::Le(b) => Some(*b),
            Constraint::Ge(_) => None,
        });
        for lo in lower {
            if upper.clone().any(|hi| lo > hi) {
                return Err(format!("field '{}' has an empty range", self.name));
            }
        }

        if let Some(default) = self.default.as_ref().filter(|d| !d.is_null()) {
            let value = coerce(default, self.field_type).ok_or_else(|| {
                format!(
                    "default for field '{}' is not a valid {}",
                    self.name, self.field_type
                )
            })?;
            if let Some(n) = value.as_number() {
                if let Some(c) = self.constraints.iter().find(|c| !c.check(n)) {
                    return Err(format!(
                        "default for field '{}' violates {}",
                        self.name, c
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Complete schema definition: a name plus an ordered rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Schema name, e.g. `Event`
    pub name: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new schema
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields,
        }
    }

    /// Attaches a description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Looks up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Collection records of this schema are persisted to
    pub fn collection(&self) -> String {
        collection_name(&self.name)
    }

    /// Validates the schema structure itself (not a document)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("schema name must not be empty".into());
        }
        // Names become file names on save
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(format!(
                "schema name '{}' may only contain ASCII letters, digits and '_'",
                self.name
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(format!("field '{}' declared more than once", field.name));
            }
            field.validate_structure()?;
        }

        Ok(())
    }
}
