//! Schema name to collection name mapping
//!
//! The storage layer addresses records by collection. A schema maps to the lowercase
//! form of its name unless it appears in the override table.

/// Irregular schema → collection names. Checked before the lowercase rule.
const COLLECTION_OVERRIDES: &[(&str, &str)] = &[("BlogPost", "blogs")];

/// Returns the collection records of `schema_name` are stored in.
pub fn collection_name(schema_name: &str) -> String {
    COLLECTION_OVERRIDES
        .iter()
        .find(|(schema, _)| *schema == schema_name)
        .map(|(_, collection)| (*collection).to_string())
        .unwrap_or_else(|| schema_name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_table() {
        assert_eq!(collection_name("BlogPost"), "blogs");
    }

    #[test]
    fn test_lowercase_rule() {
        assert_eq!(collection_name("Event"), "event");
        assert_eq!(collection_name("User"), "user");
        assert_eq!(collection_name("Booking"), "booking");
        assert_eq!(collection_name("Product"), "product");
    }

    #[test]
    fn test_no_pluralization_outside_table() {
        assert_eq!(collection_name("NewsPost"), "newspost");
        assert_eq!(collection_name("blogpost"), "blogpost");
    }
}
