//! Shared test collection
//!
//! Fifteen documents spread over kinds, genres and years, each with a
//! numeric `catalogId`. Ids are generated on insert.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use collview::store::{Cursor, MemoryStore, SharedStore};

pub fn books() -> Vec<Value> {
    vec![
        json!({"title": "Fiction Book 1", "kind": "book", "genre": "fiction", "catalogId": 0}),
        json!({"title": "Fiction Book 2", "kind": "book", "genre": "fiction", "catalogId": 1}),
        json!({"title": "Science Book 1", "kind": "book", "genre": "science", "catalogId": 2}),
        json!({"title": "Science Magazine 1", "kind": "magazine", "genre": "science", "catalogId": 3}),
        json!({"title": "Fiction Magazine 1", "kind": "magazine", "genre": "fiction", "catalogId": 4}),
        json!({"title": "Removable 1", "kind": "kind1", "genre": "removable", "catalogId": 5}),
        json!({"title": "Removable 2", "kind": "kind2", "genre": "removable", "catalogId": 6}),
        json!({"title": "Removable 3", "kind": "kind2", "genre": "removable", "catalogId": 7}),
        json!({"title": "Non-Removable 1", "kind": "kind2", "genre": "nonremovable", "catalogId": 8}),
        json!({"title": "Removable 4", "kind": "kind3", "genre": "removable", "catalogId": 9}),
        json!({"title": "Chainable 1", "kind": "leaflet", "genre": "advertising", "year": 1999, "catalogId": 10}),
        json!({"title": "Chainable 2", "kind": "leaflet", "genre": "cooking", "year": 1999, "catalogId": 11}),
        json!({"title": "Chainable 3", "kind": "tome", "genre": "cooking", "year": 1999, "catalogId": 12}),
        json!({"title": "Chainable 4", "kind": "tome", "genre": "cooking", "year": 2000, "catalogId": 13}),
        json!({"title": "Chainable 5", "kind": "tome", "genre": "advertising", "year": 2001, "catalogId": 14}),
    ]
}

/// Fresh store holding `books()`
pub fn new_collection() -> SharedStore {
    Arc::new(MemoryStore::with_documents(books()).unwrap())
}

/// Titles in result order
pub fn titles(cursor: &Cursor) -> Vec<String> {
    cursor
        .iter()
        .filter_map(|doc| doc["title"].as_str().map(str::to_string))
        .collect()
}

/// Field names of a document, sorted
pub fn keys(doc: &Value) -> Vec<&str> {
    let mut keys: Vec<&str> = doc
        .as_object()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    keys.sort();
    keys
}
