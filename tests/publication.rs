//! Publications of view queries

mod fixtures;

use std::sync::{Arc, Mutex};

use serde_json::json;

use collview::projection::Projection;
use collview::publish::PublicationRegistry;
use collview::selector::Selector;
use collview::store::{FindOptions, UpdateOptions};
use collview::view::{Predicate, Scope, ViewError};

use fixtures::{keys, new_collection, titles};

#[test]
fn test_publication_merges_view_and_caller_selectors() {
    let store = new_collection();
    let registry = PublicationRegistry::new();
    let books = store.scope(json!({"kind": "book"}));

    registry
        .publish("fiction-books", &books, json!({"genre": "fiction"}), FindOptions::new())
        .unwrap();

    let cursor = registry.poll("fiction-books").unwrap();
    assert_eq!(titles(&cursor), vec!["Fiction Book 1", "Fiction Book 2"]);
}

#[test]
fn test_publication_applies_view_projection() {
    let store = new_collection();
    let registry = PublicationRegistry::new();
    let titles_only = store.scope_with_fields(json!({"kind": "magazine"}), Projection::include(["title"]));

    let publication = registry
        .publish("magazines", &titles_only, Selector::new(), FindOptions::new())
        .unwrap();

    let docs = publication.poll().unwrap().fetch();
    assert_eq!(docs.len(), 2);
    for doc in &docs {
        assert_eq!(keys(doc), vec!["_id", "title"]);
    }
}

#[test]
fn test_poll_sees_store_changes() {
    let store = new_collection();
    let registry = PublicationRegistry::new();
    let science = store.scope(json!({"genre": "science"}));
    registry
        .publish("science", &science, Selector::new(), FindOptions::new())
        .unwrap();

    assert_eq!(registry.poll("science").unwrap().count(), 2);

    store
        .scope(json!({"kind": "tome"}))
        .update(Selector::new(), &json!({"$set": {"genre": "science"}}), UpdateOptions::multi())
        .unwrap();

    assert_eq!(registry.poll("science").unwrap().count(), 5);
}

#[test]
fn test_dynamic_predicate_re_resolved_per_poll() {
    let store = new_collection();
    let registry = PublicationRegistry::new();

    let kind = Arc::new(Mutex::new("book".to_string()));
    let state = Arc::clone(&kind);
    let current = store.scope(Predicate::dynamic(move || {
        let kind = state.lock().unwrap().clone();
        json!({ "kind": kind })
    }));

    let publication = registry
        .publish("current-kind", &current, json!({"genre": "science"}), FindOptions::new())
        .unwrap();

    assert_eq!(titles(&publication.poll().unwrap()), vec!["Science Book 1"]);

    *kind.lock().unwrap() = "magazine".to_string();
    assert_eq!(titles(&registry.poll("current-kind").unwrap()), vec!["Science Magazine 1"]);
    assert_eq!(
        publication.query().selector.to_value(),
        json!({"genre": "science", "kind": "magazine"})
    );
}

#[test]
fn test_registry_errors() {
    let store = new_collection();
    let registry = PublicationRegistry::new();
    let view = store.scope(json!({}));

    registry.publish("all", &view, Selector::new(), FindOptions::new()).unwrap();
    assert!(matches!(
        registry.publish("all", &view, Selector::new(), FindOptions::new()),
        Err(ViewError::DuplicatePublication(_))
    ));
    assert!(matches!(registry.poll("none"), Err(ViewError::UnknownPublication(_))));

    let removed = registry.unpublish("all").unwrap();
    assert_eq!(removed.name(), "all");
    assert!(registry.get("all").is_none());
}
