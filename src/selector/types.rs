//! Selector value type

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identifier::{is_identifier, normalize_identifier};

/// Key holding a value that was neither an object nor an identifier
const MALFORMED_KEY: &str = "$malformed";

/// A query predicate: field path (dot-separated) to match constraint.
///
/// Constraints are literal values or operator documents such as
/// `{"$gte": 1999}`; their meaning belongs to the store. Top-level
/// `$and` / `$or` / `$nor` keys combine nested selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Selector(Map<String, Value>);

impl Selector {
    /// Creates an empty selector that matches every document
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Creates an identifier selector `{ "_id": id }`
    pub fn id(id: impl Into<Value>) -> Self {
        normalize_identifier(id.into())
    }

    /// Adds a constraint, replacing any existing constraint on `field`
    pub fn with(mut self, field: impl Into<String>, constraint: Value) -> Self {
        self.0.insert(field.into(), constraint);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, constraint: Value) -> Option<Value> {
        self.0.insert(field.into(), constraint)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// The value this selector was built from, if it was neither an object
    /// nor an identifier. Stores reject such selectors.
    pub fn malformed(&self) -> Option<&Value> {
        self.0.get(MALFORMED_KEY)
    }
}

impl From<Map<String, Value>> for Selector {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Objects become selectors, `null` the empty selector, and identifiers
/// the shorthand `{ "_id": value }`. Anything else is kept as a malformed
/// selector.
impl From<Value> for Selector {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Null => Self::new(),
            id if is_identifier(&id) => normalize_identifier(id),
            other => {
                let mut map = Map::new();
                map.insert(MALFORMED_KEY.to_string(), other);
                Self(map)
            }
        }
    }
}

impl From<&str> for Selector {
    fn from(id: &str) -> Self {
        Self::from(Value::from(id))
    }
}

impl From<String> for Selector {
    fn from(id: String) -> Self {
        Self::from(Value::String(id))
    }
}

impl From<Selector> for Value {
    fn from(selector: Selector) -> Self {
        Value::Object(selector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_becomes_selector() {
        let selector = Selector::from(json!({"kind": "book"}));
        assert_eq!(selector.get("kind"), Some(&json!("book")));
        assert_eq!(selector.len(), 1);
    }

    #[test]
    fn test_null_is_empty() {
        assert!(Selector::from(Value::Null).is_empty());
    }

    #[test]
    fn test_scalar_is_id_shorthand() {
        assert_eq!(Selector::from("abc").to_value(), json!({"_id": "abc"}));
        assert_eq!(Selector::from(json!(42)).to_value(), json!({"_id": 42}));
    }

    #[test]
    fn test_non_identifier_is_malformed() {
        for value in [json!(true), json!(["a"]), json!(""), json!([{"kind": "book"}])] {
            let selector = Selector::from(value.clone());
            assert_eq!(selector.malformed(), Some(&value));
            assert!(selector.get("_id").is_none());
        }

        assert!(Selector::from("").malformed().is_some());
        assert!(Selector::from("abc").malformed().is_none());
    }

    #[test]
    fn test_deserialize_accepts_shorthand() {
        let selector: Selector = serde_json::from_value(json!("doc-1")).unwrap();
        assert_eq!(selector, Selector::id("doc-1"));

        let selector: Selector = serde_json::from_value(json!({"genre": "fiction"})).unwrap();
        assert_eq!(selector.get("genre"), Some(&json!("fiction")));
    }
}
