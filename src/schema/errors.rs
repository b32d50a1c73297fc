//! Schema error types
//!
//! Error codes:
//! - SCHEMA_VALIDATION_FAILED (record rejected, field errors attached)
//! - UNKNOWN_SCHEMA
//! - DUPLICATE_SCHEMA
//! - MALFORMED_SCHEMA
//! - INVALID_CONFIG
//! - SCHEMA_IO
//! - RECORD_DECODE

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use super::types::Constraint;

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Required field absent or null
    MissingField,
    /// Value could not be coerced to the declared type
    TypeMismatch { expected: &'static str },
    /// Value outside a declared range
    ConstraintViolation { constraint: Constraint },
    /// Undeclared field, reported only under the reject policy
    UnknownField,
}

impl FieldErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::MissingField => "missing_field",
            FieldErrorKind::TypeMismatch { .. } => "type_mismatch",
            FieldErrorKind::ConstraintViolation { .. } => "constraint_violation",
            FieldErrorKind::UnknownField => "unknown_field",
        }
    }
}

/// Validation failure for one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Field name (`$root` when the record itself is not an object)
    pub field: String,
    #[serde(flatten)]
    pub kind: FieldErrorKind,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::MissingField,
            message: "field required".into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, actual: &str) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::TypeMismatch { expected },
            message: format!("expected {}, got {}", expected, actual),
        }
    }

    pub fn constraint_violation(field: impl Into<String>, constraint: Constraint) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::ConstraintViolation { constraint },
            message: constraint.violation_message(),
        }
    }

    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::UnknownField,
            message: "extra fields not permitted".into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

/// Every field error found in one record, in schema declaration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    schema: String,
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(schema: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            schema: schema.into(),
            errors,
        }
    }

    /// Schema the record was validated against
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Names of failing fields, in reporting order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    /// Returns the first error reported for `field`
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.errors.len() == 1 { "" } else { "s" };
        write!(
            f,
            "{} validation error{} for {}",
            self.errors.len(),
            plural,
            self.schema
        )?;
        for error in &self.errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised by schema registration, loading and validation
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Record rejected; all failing fields are attached
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Schema '{0}' not found")]
    UnknownSchema(String),

    #[error("Schema '{0}' is already registered")]
    DuplicateSchema(String),

    #[error("Malformed schema '{origin}': {reason}")]
    MalformedSchema { origin: String, reason: String },

    #[error("Invalid validator config: {0}")]
    InvalidConfig(String),

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Validated record did not decode into its entity type
    #[error("Failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SchemaError {
    pub(crate) fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedSchema {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Validation(_) => "SCHEMA_VALIDATION_FAILED",
            SchemaError::UnknownSchema(_) => "UNKNOWN_SCHEMA",
            SchemaError::DuplicateSchema(_) => "DUPLICATE_SCHEMA",
            SchemaError::MalformedSchema { .. } => "MALFORMED_SCHEMA",
            SchemaError::InvalidConfig(_) => "INVALID_CONFIG",
            SchemaError::Io { .. } => "SCHEMA_IO",
            SchemaError::Decode(_) => "RECORD_DECODE",
        }
    }

    /// Whether the caller's input caused the error (as opposed to setup or I/O)
    pub fn is_client_error(&self) -> bool {
        matches!(self, SchemaError::Validation(_) | SchemaError::UnknownSchema(_))
    }

    /// Field errors if this is a validation failure
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        let err = SchemaError::from(ValidationError::new("Event", vec![]));
        assert_eq!(err.code(), "SCHEMA_VALIDATION_FAILED");
        assert_eq!(SchemaError::UnknownSchema("X".into()).code(), "UNKNOWN_SCHEMA");
        assert_eq!(SchemaError::DuplicateSchema("X".into()).code(), "DUPLICATE_SCHEMA");
        assert_eq!(SchemaError::malformed("a.json", "bad").code(), "MALFORMED_SCHEMA");
    }

    #[test]
    fn test_client_errors() {
        assert!(SchemaError::UnknownSchema("X".into()).is_client_error());
        assert!(!SchemaError::malformed("a.json", "bad").is_client_error());
    }

    #[test]
    fn test_field_error_messages() {
        let err = FieldError::type_mismatch("age", "int", "string");
        assert_eq!(err.to_string(), "field 'age': expected int, got string");

        let err = FieldError::constraint_violation("quantity", Constraint::Le(10.0));
        assert_eq!(err.message, "must be less than or equal to 10");
    }

    #[test]
    fn test_validation_error_display_lists_all_fields() {
        let err = ValidationError::new(
            "Booking",
            vec![
                FieldError::missing_field("email"),
                FieldError::constraint_violation("quantity", Constraint::Ge(1.0)),
            ],
        );
        let display = err.to_string();
        assert!(display.starts_with("2 validation errors for Booking"));
        assert!(display.contains("email"));
        assert!(display.contains("quantity"));
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["email", "quantity"]);
    }

    #[test]
    fn test_field_error_serializes_for_response_body() {
        let err = FieldError::constraint_violation("price", Constraint::Ge(0.0));
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(
            body,
            json!({
                "field": "price",
                "kind": "constraint_violation",
                "constraint": {"ge": 0.0},
                "message": "must be greater than or equal to 0"
            })
        );
    }
}
