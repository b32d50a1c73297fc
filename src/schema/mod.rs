//! Schema subsystem
//!
//! Schemas are declarative rule tables: one ordered list of field definitions per
//! entity, consumed by a single generic validator.
//!
//! # Design Principles
//!
//! - Every failing field is reported in one pass
//! - Defaults fill absent optional fields
//! - Lax coercion of textual numbers, booleans and ISO 8601 timestamps
//! - Collection names come from an explicit override table
//! - Validation is pure and deterministic

pub mod builtin;
mod coerce;
mod config;
mod errors;
pub mod naming;
mod registry;
mod types;
mod validator;
mod value;

use std::sync::OnceLock;

use serde_json::{Map, Value};

pub use config::{UnknownFieldPolicy, ValidatorConfig};
pub use errors::{FieldError, FieldErrorKind, SchemaError, SchemaResult, ValidationError};
pub use naming::collection_name;
pub use registry::SchemaRegistry;
pub use types::{Constraint, FieldDef, FieldType, Schema};
pub use validator::{validate_record, SchemaValidator};
pub use value::{FieldValue, TypedRecord};

/// Registry of the built-in schemas, created on first use.
pub fn builtin_registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(SchemaRegistry::builtin)
}

/// Validates a raw record against a built-in schema, ignoring undeclared fields.
pub fn validate(schema_name: &str, raw: &Map<String, Value>) -> SchemaResult<TypedRecord> {
    SchemaValidator::new(builtin_registry()).validate(schema_name, raw)
}
