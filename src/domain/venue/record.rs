//! Ordered venue attribute records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text form of an attribute value: strings as-is, everything else in its
/// JSON rendering. Used for constraint matching and value comparisons.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One row from the venue store: an ordered sequence of (attribute, value)
/// pairs.
///
/// Attribute order is declared by the store's schema, never inferred from a
/// hash map, so every consumer sees the same order. Composite attributes
/// (opening hours, reviews, service manners) are structured JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueRecord {
    fields: Vec<(String, Value)>,
}

impl VenueRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from ordered (attribute, value) pairs.
    pub fn from_fields(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Appends an attribute, replacing any existing value for it.
    pub fn set(&mut self, attribute: impl Into<String>, value: Value) {
        let attribute = attribute.into();
        match self.fields.iter_mut().find(|(a, _)| *a == attribute) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((attribute, value)),
        }
    }

    /// Returns the value for an attribute, if present.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, value)| value)
    }

    /// Returns the value for an attribute as a string slice, if it is a
    /// non-empty string.
    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        match self.get(attribute) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// Returns the attribute names in declared order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(attribute, _)| attribute.as_str())
    }

    /// Returns the ordered (attribute, value) pairs.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Returns true if the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> VenueRecord {
        VenueRecord::from_fields(vec![
            ("name".to_string(), json!("luigis")),
            ("food_type".to_string(), json!("italian")),
            ("rating".to_string(), json!(4.2)),
        ])
    }

    #[test]
    fn get_returns_declared_values() {
        let rec = record();
        assert_eq!(rec.get("name"), Some(&json!("luigis")));
        assert_eq!(rec.get("rating"), Some(&json!(4.2)));
        assert_eq!(rec.get("unknown"), None);
    }

    #[test]
    fn attributes_keep_declared_order() {
        let rec = record();
        let attrs: Vec<_> = rec.attributes().collect();
        assert_eq!(attrs, vec!["name", "food_type", "rating"]);
    }

    #[test]
    fn get_str_rejects_empty_and_non_string() {
        let mut rec = record();
        rec.set("description", json!(""));
        assert_eq!(rec.get_str("name"), Some("luigis"));
        assert_eq!(rec.get_str("description"), None);
        assert_eq!(rec.get_str("rating"), None);
    }

    #[test]
    fn set_replaces_existing_value_in_place() {
        let mut rec = record();
        rec.set("food_type", json!("pizza"));
        let attrs: Vec<_> = rec.attributes().collect();
        assert_eq!(attrs, vec!["name", "food_type", "rating"]);
        assert_eq!(rec.get_str("food_type"), Some("pizza"));
    }

    #[test]
    fn serializes_as_pair_list() {
        let rec = record();
        let json = serde_json::to_string(&rec).unwrap();
        let back: VenueRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }

    #[test]
    fn value_text_keeps_strings_and_renders_the_rest() {
        assert_eq!(value_text(&json!("center")), "center");
        assert_eq!(value_text(&json!(4.5)), "4.5");
        assert_eq!(value_text(&json!(null)), "null");
    }
}
