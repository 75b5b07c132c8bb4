//! Identifier shorthand helpers
//!
//! A bare identifier passed where a selector is expected means "the
//! document with this `_id`". These helpers are pure functions; nothing
//! here changes process-wide behavior.

use serde_json::{Map, Value};

use super::types::Selector;
use super::ID_FIELD;

/// Returns true if `value` is usable as a bare document identifier.
///
/// Non-empty strings and numbers qualify.
pub fn is_identifier(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

/// Wraps a bare identifier into `{ "_id": value }`
pub fn normalize_identifier(value: Value) -> Selector {
    let mut map = Map::new();
    map.insert(ID_FIELD.to_string(), value);
    Selector::from(map)
}

/// Returns true if the selector pins a single document by identifier.
///
/// Besides the plain `{ "_id": id }` form this accepts selectors carrying
/// extra constraints next to the identifier, e.g.
/// `{ "_id": "123", "kind": "public" }`; they still address at most one
/// document.
pub fn is_identifier_selector(selector: &Selector) -> bool {
    selector.get(ID_FIELD).map(is_identifier).unwrap_or(false)
}

/// Returns the identifier pinned by the selector, if any
pub fn selector_identifier(selector: &Selector) -> Option<&Value> {
    selector.get(ID_FIELD).filter(|v| is_identifier(v))
}
