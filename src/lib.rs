//! eventbook - record validation for an events and bookings document store
//!
//! Raw records (JSON objects) are validated against declarative schemas and come
//! out as typed, fully-populated records or as a list of every failing field.

pub mod entities;
pub mod schema;

pub use entities::{Booking, Entity, Event, Product, User};
pub use schema::{
    collection_name, validate, FieldError, FieldErrorKind, FieldValue, SchemaError,
    SchemaRegistry, SchemaResult, SchemaValidator, TypedRecord, ValidationError,
};
