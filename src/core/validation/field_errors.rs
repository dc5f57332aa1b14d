//! Field-keyed validation messages

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key used when a payload fails before any field could be inspected
pub const DECODE_ERROR_KEY: &str = "error";

/// Mapping from wire field name to a single human-readable message
///
/// Fields keep the order in which they were reported, which is the schema's
/// declaration order. Serializes as a flat JSON object:
/// `{ "username": "username must be at least 3 characters" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Bag holding only the decode sentinel
    pub fn decode(message: impl Into<String>) -> Self {
        let mut bag = Self::new();
        bag.insert(DECODE_ERROR_KEY, message);
        bag
    }

    /// Record a message for a field
    ///
    /// The first message recorded for a field wins; later ones are ignored.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// True when every given field has an entry
    pub fn contains_all(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.contains(f))
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for FieldErrors {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (field, message) in iter {
            bag.insert(field, message);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut bag = FieldErrors::new();
        bag.insert("username", "first");
        bag.insert("username", "second");
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("username"), Some("first"));
    }

    #[test]
    fn test_decode_bag_uses_sentinel_key() {
        let bag = FieldErrors::decode("expected value at line 1 column 1");
        assert_eq!(bag.fields(), vec!["error"]);
    }

    #[test]
    fn test_serializes_flat_object() {
        let bag: FieldErrors = [("username", "too short"), ("password", "weak")]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&bag).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "username": "too short", "password": "weak" })
        );
    }

    #[test]
    fn test_contains_all() {
        let bag: FieldErrors = [("a", "x"), ("b", "y")].into_iter().collect();
        assert!(bag.contains_all(&["a", "b"]));
        assert!(!bag.contains_all(&["a", "c"]));
        assert!(bag.contains_all(&[]));
    }

    #[test]
    fn test_preserves_report_order() {
        let bag: FieldErrors = [("z", "1"), ("a", "2"), ("m", "3")].into_iter().collect();
        assert_eq!(bag.fields(), vec!["z", "a", "m"]);
    }
}
