//! Typed entities
//!
//! Strongly-typed views of the built-in schemas. Each entity is decoded from a
//! validated [`TypedRecord`], so every invariant of its schema already holds.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::builtin::{BOOKING, EVENT, PRODUCT, USER};
use crate::schema::naming::collection_name;
use crate::schema::{SchemaResult, TypedRecord};

/// A Rust type backed by a registered schema.
pub trait Entity: Serialize + DeserializeOwned {
    /// Name of the schema records are validated against
    const SCHEMA: &'static str;

    /// Collection this entity is stored in
    fn collection() -> String {
        collection_name(Self::SCHEMA)
    }

    /// Decodes a record previously validated against [`Self::SCHEMA`].
    fn from_record(record: &TypedRecord) -> SchemaResult<Self> {
        Ok(serde_json::from_value(record.to_json())?)
    }

    /// Raw form of this entity, ready for (re-)validation or storage
    fn to_raw(&self) -> SchemaResult<Map<String, Value>> {
        Ok(serde_json::from_value(serde_json::to_value(self)?)?)
    }
}

/// Local event such as a food festival, market or concert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub city: String,
    pub venue: Option<String>,
    pub date: DateTime<FixedOffset>,
    pub price: f64,
    pub capacity: i64,
    pub image_url: Option<String>,
}

impl Entity for Event {
    const SCHEMA: &'static str = EVENT;
}

/// Booking of tickets for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Target event id; not checked for existence
    pub event_id: String,
    pub name: String,
    pub email: String,
    /// Between 1 and 10 tickets
    pub quantity: i64,
}

impl Entity for Booking {
    const SCHEMA: &'static str = BOOKING;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub address: String,
    pub age: Option<i64>,
    pub is_active: bool,
}

impl Entity for User {
    const SCHEMA: &'static str = USER;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
}

impl Entity for Product {
    const SCHEMA: &'static str = PRODUCT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaRegistry, SchemaValidator};
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_collections() {
        assert_eq!(Event::collection(), "event");
        assert_eq!(Booking::collection(), "booking");
        assert_eq!(User::collection(), "user");
        assert_eq!(Product::collection(), "product");
    }

    #[test]
    fn test_decode_event_with_defaults() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let event: Event = validator
            .validate_as(&raw(json!({
                "title": "Jazz Night",
                "city": "Austin",
                "date": "2024-05-01T20:00:00"
            })))
            .unwrap();

        assert_eq!(event.category, "Food Festival");
        assert_eq!(event.price, 0.0);
        assert_eq!(event.capacity, 0);
        assert_eq!(event.venue, None);
        assert_eq!(event.date.to_rfc3339(), "2024-05-01T20:00:00+00:00");
    }

    #[test]
    fn test_decode_user_optional_age() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let user: User = validator
            .validate_as(&raw(json!({"name": "Ana", "email": "ana@example.com", "address": "1 Main St"})))
            .unwrap();
        assert_eq!(user.age, None);
        assert!(user.is_active);
    }

    #[test]
    fn test_validate_as_propagates_field_errors() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let err = validator
            .validate_as::<Booking>(&raw(json!({"event_id": "e1", "name": "Ana", "email": "a", "quantity": 11})))
            .unwrap_err();
        let fields: Vec<&str> = err.validation().unwrap().fields().collect();
        assert_eq!(fields, vec!["quantity"]);
    }

    #[test]
    fn test_entity_round_trips_through_validation() {
        let registry = SchemaRegistry::builtin();
        let validator = SchemaValidator::new(&registry);

        let product = Product {
            title: "Mug".into(),
            description: None,
            price: -2.5,
            category: "Kitchen".into(),
            in_stock: false,
        };
        let again: Product = validator.validate_as(&product.to_raw().unwrap()).unwrap();
        assert_eq!(again, product);
    }
}
