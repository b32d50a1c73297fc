//! Built-in schemas: Event, Booking, User, Product

use serde_json::json;

use super::types::{FieldDef, FieldType, Schema};

pub const EVENT: &str = "Event";
pub const BOOKING: &str = "Booking";
pub const USER: &str = "User";
pub const PRODUCT: &str = "Product";

/// Local events such as food festivals, markets and concerts
pub fn event() -> Schema {
    Schema::new(
        EVENT,
        vec![
            FieldDef::required("title", FieldType::String).describe("Event name"),
            FieldDef::optional("description", FieldType::String).describe("Short description"),
            FieldDef::with_default("category", FieldType::String, json!("Food Festival"))
                .describe("Category, e.g. Food Festival, Market"),
            FieldDef::required("city", FieldType::String).describe("City or town"),
            FieldDef::optional("venue", FieldType::String).describe("Venue name"),
            FieldDef::required("date", FieldType::Timestamp).describe("Event start date/time"),
            FieldDef::with_default("price", FieldType::Decimal, json!(0))
                .ge(0.0)
                .describe("Ticket price per person"),
            FieldDef::with_default("capacity", FieldType::Int, json!(0))
                .ge(0.0)
                .describe("Total capacity"),
            FieldDef::optional("image_url", FieldType::String).describe("Cover image"),
        ],
    )
    .describe("Local events (food festivals, markets, local concerts)")
}

/// Ticket bookings; `event_id` is not checked against stored events
pub fn booking() -> Schema {
    Schema::new(
        BOOKING,
        vec![
            FieldDef::required("event_id", FieldType::String).describe("Target event id"),
            FieldDef::required("name", FieldType::String).describe("Guest full name"),
            FieldDef::required("email", FieldType::String).describe("Guest email"),
            FieldDef::required("quantity", FieldType::Int)
                .ge(1.0)
                .le(10.0)
                .describe("Number of tickets"),
        ],
    )
    .describe("Bookings for events")
}

pub fn user() -> Schema {
    Schema::new(
        USER,
        vec![
            FieldDef::required("name", FieldType::String),
            FieldDef::required("email", FieldType::String),
            FieldDef::required("address", FieldType::String),
            FieldDef::optional("age", FieldType::Int),
            FieldDef::with_default("is_active", FieldType::Bool, json!(true)),
        ],
    )
}

/// Product.price has no lower bound.
pub fn product() -> Schema {
    Schema::new(
        PRODUCT,
        vec![
            FieldDef::required("title", FieldType::String),
            FieldDef::optional("description", FieldType::String),
            FieldDef::required("price", FieldType::Decimal),
            FieldDef::required("category", FieldType::String),
            FieldDef::with_default("in_stock", FieldType::Bool, json!(true)),
        ],
    )
}

/// All built-in schemas
pub fn all() -> Vec<Schema> {
    vec![event(), booking(), user(), product()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_structures_valid() {
        for schema in all() {
            assert!(
                schema.validate_structure().is_ok(),
                "{} failed structure check",
                schema.name
            );
        }
    }

    #[test]
    fn test_builtin_collections() {
        let collections: Vec<String> = all().iter().map(Schema::collection).collect();
        assert_eq!(collections, vec!["event", "booking", "user", "product"]);
    }

    #[test]
    fn test_event_field_order() {
        let binding = event();
        let names: Vec<&str> = binding.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "description",
                "category",
                "city",
                "venue",
                "date",
                "price",
                "capacity",
                "image_url"
            ]
        );
    }
}
