//! Record validator
//!
//! Validation semantics:
//! - Required fields must be present and non-null
//! - Present values are coerced to the declared field type
//! - Coerced numbers must satisfy every declared range constraint
//! - Absent optional fields receive their default (null when none is declared)
//! - Explicit null is treated as absence
//! - Every failing field is reported, not just the first
//!
//! Validation is pure: it never mutates its input and holds no state between calls.

use serde_json::{Map, Value};
use tracing::debug;

use super::coerce::{coerce, json_type_name};
use super::config::{UnknownFieldPolicy, ValidatorConfig};
use super::errors::{FieldError, SchemaResult, ValidationError};
use super::registry::SchemaRegistry;
use super::types::{FieldDef, Schema};
use super::value::{FieldValue, TypedRecord};
use crate::entities::Entity;

/// Validates raw records against the schemas of a registry.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
    unknown_fields: UnknownFieldPolicy,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator that ignores undeclared fields.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            unknown_fields: UnknownFieldPolicy::Ignore,
        }
    }

    /// Creates a validator using the policies in `config`.
    pub fn with_config(registry: &'a SchemaRegistry, config: &ValidatorConfig) -> Self {
        Self {
            registry,
            unknown_fields: config.unknown_fields,
        }
    }

    /// Validates a raw record against the named schema.
    ///
    /// # Errors
    ///
    /// - `UnknownSchema` if the registry has no such schema
    /// - `Validation` listing every failing field
    pub fn validate(&self, schema_name: &str, raw: &Map<String, Value>) -> SchemaResult<TypedRecord> {
        let schema = self.registry.require(schema_name)?;
        Ok(validate_record(schema, raw, self.unknown_fields)?)
    }

    /// Validates any JSON value; non-objects fail on `$root`.
    pub fn validate_document(&self, schema_name: &str, document: &Value) -> SchemaResult<TypedRecord> {
        let schema = self.registry.require(schema_name)?;

        let raw = document.as_object().ok_or_else(|| {
            ValidationError::new(
                &schema.name,
                vec![FieldError::type_mismatch("$root", "object", json_type_name(document))],
            )
        })?;

        Ok(validate_record(schema, raw, self.unknown_fields)?)
    }

    /// Validates against `E`'s schema and decodes into `E`.
    pub fn validate_as<E: Entity>(&self, raw: &Map<String, Value>) -> SchemaResult<E> {
        let record = self.validate(E::SCHEMA, raw)?;
        E::from_record(&record)
    }
}

/// Validates `raw` against one schema's rule table.
///
/// This is the single generic routine every schema goes through.
pub fn validate_record(
    schema: &Schema,
    raw: &Map<String, Value>,
    unknown_fields: UnknownFieldPolicy,
) -> Result<TypedRecord, ValidationError> {
    let mut errors = Vec::new();
    let mut fields = Vec::with_capacity(schema.fields.len());

    for def in &schema.fields {
        match validate_field(def, raw.get(&def.name)) {
            Ok(value) => fields.push((def.name.clone(), value)),
            Err(mut field_errors) => errors.append(&mut field_errors),
        }
    }

    if unknown_fields == UnknownFieldPolicy::Reject {
        errors.extend(
            raw.keys()
                .filter(|key| schema.field(key).is_none())
                .map(FieldError::unknown_field),
        );
    }

    if errors.is_empty() {
        Ok(TypedRecord::new(&schema.name, fields))
    } else {
        debug!(
            schema = %schema.name,
            error_count = errors.len(),
            "record rejected"
        );
        Err(ValidationError::new(&schema.name, errors))
    }
}

/// Validates one field. A present value can violate several constraints at once.
fn validate_field(def: &FieldDef, raw: Option<&Value>) -> Result<FieldValue, Vec<FieldError>> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        if def.required {
            return Err(vec![FieldError::missing_field(&def.name)]);
        }
        return match def.default.as_ref().filter(|d| !d.is_null()) {
            None => Ok(FieldValue::Null),
            Some(default) => coerce(default, def.field_type).ok_or_else(|| {
                vec![FieldError::type_mismatch(
                    &def.name,
                    def.field_type.type_name(),
                    json_type_name(default),
                )]
            }),
        };
    };

    let value = coerce(raw, def.field_type).ok_or_else(|| {
        vec![FieldError::type_mismatch(
            &def.name,
            def.field_type.type_name(),
            json_type_name(raw),
        )]
    })?;

    if let Some(n) = value.as_number() {
        let violations: Vec<FieldError> = def
            .constraints
            .iter()
            .filter(|c| !c.check(n))
            .map(|c| FieldError::constraint_violation(&def.name, *c))
            .collect();
        if !violations.is_empty() {
            return Err(violations);
        }
    }

    Ok(value)
}
