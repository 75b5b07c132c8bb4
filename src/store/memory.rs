//! In-memory document store
//!
//! Documents are kept in insertion order, so unsorted reads are
//! deterministic. All operations are synchronous and take a single lock.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use serde_json::Value;
use uuid::Uuid;

use crate::selector::{selector_identifier, Selector, ID_FIELD};

use super::cursor::Cursor;
use super::errors::{StoreError, StoreResult};
use super::matcher::SelectorMatcher;
use super::modifier::{apply_modifier, upsert_seed};
use super::options::{FindOptions, UpdateOptions, UpsertResult};
use super::projector::project;
use super::sorter::ResultSorter;
use super::DocumentStore;

/// In-memory collection of JSON documents
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<Value>>,
    indexes: RwLock<BTreeSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `documents`, generating missing ids
    pub fn with_documents<I>(documents: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let store = Self::new();
        for document in documents {
            store.insert(document)?;
        }
        Ok(store)
    }

    /// Loads a store from a JSON array file
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path)?;
        let documents: Vec<Value> = serde_json::from_str(&content)?;
        Self::with_documents(documents)
    }

    /// Writes every document to `path` as a JSON array
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let snapshot = self.snapshot()?;
        let content = serde_json::to_string_pretty(&snapshot)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Copies every stored document, in insertion order
    pub fn snapshot(&self) -> StoreResult<Vec<Value>> {
        let documents = self.read()?;
        Ok(documents.clone())
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<Value>>> {
        self.documents
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<Value>>> {
        self.documents
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))
    }

    /// Positions of matching documents, in insertion order.
    ///
    /// Identifier selectors are resolved by `_id` first, then checked
    /// against the remaining constraints.
    fn matching_positions(
        documents: &[Value],
        selector: &Selector,
    ) -> StoreResult<Vec<usize>> {
        SelectorMatcher::check(selector)?;

        let pinned = selector_identifier(selector);
        let mut positions = Vec::new();

        for (position, document) in documents.iter().enumerate() {
            if let Some(id) = pinned {
                if document.get(ID_FIELD) != Some(id) {
                    continue;
                }
            }

            if SelectorMatcher::matches(document, selector)? {
                positions.push(position);
                if pinned.is_some() {
                    break;
                }
            }
        }

        Ok(positions)
    }

    /// Applies `modifier` at `positions`, all or nothing.
    fn modify_positions(
        documents: &mut [Value],
        positions: &[usize],
        modifier: &Value,
    ) -> StoreResult<usize> {
        // Apply to copies first so a failing modifier changes nothing.
        let mut updated = Vec::with_capacity(positions.len());
        for &position in positions {
            let mut document = match &documents[position] {
                Value::Object(map) => map.clone(),
                _ => return Err(StoreError::Internal("stored document is not an object".into())),
            };
            apply_modifier(&mut document, modifier)?;
            updated.push((position, document));
        }

        let count = updated.len();
        for (position, document) in updated {
            documents[position] = Value::Object(document);
        }
        Ok(count)
    }

    fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn id_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl DocumentStore for MemoryStore {
    fn find(&self, selector: &Selector, options: &FindOptions) -> StoreResult<Cursor> {
        let documents = self.read()?;
        let positions = Self::matching_positions(&documents, selector)?;

        let mut results: Vec<Value> = positions
            .into_iter()
            .map(|p| documents[p].clone())
            .collect();
        drop(documents);

        ResultSorter::sort(&mut results, &options.sort);

        let skip = options.skip.unwrap_or(0);
        let limit = options.limit.unwrap_or(usize::MAX);

        let results = results
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| match &options.fields {
                Some(fields) => project(&doc, fields),
                None => doc,
            })
            .collect();

        Ok(Cursor::new(results))
    }

    fn update(
        &self,
        selector: &Selector,
        modifier: &Value,
        options: &UpdateOptions,
    ) -> StoreResult<usize> {
        let mut documents = self.write()?;
        let mut positions = Self::matching_positions(&documents, selector)?;
        if !options.multi {
            positions.truncate(1);
        }

        Self::modify_positions(&mut documents, &positions, modifier)
    }

    fn remove(&self, selector: &Selector) -> StoreResult<usize> {
        let mut documents = self.write()?;
        let positions = Self::matching_positions(&documents, selector)?;

        for &position in positions.iter().rev() {
            documents.remove(position);
        }
        Ok(positions.len())
    }

    fn upsert(
        &self,
        selector: &Selector,
        modifier: &Value,
        options: &UpdateOptions,
    ) -> StoreResult<UpsertResult> {
        let mut documents = self.write()?;
        let mut positions = Self::matching_positions(&documents, selector)?;

        if !positions.is_empty() {
            if !options.multi {
                positions.truncate(1);
            }
            return Self::modify_positions(&mut documents, &positions, modifier)
                .map(UpsertResult::updated);
        }

        let mut document = upsert_seed(selector);
        apply_modifier(&mut document, modifier)?;

        let id = match document.get(ID_FIELD) {
            Some(id) => Self::id_string(id),
            None => {
                let id = Self::generate_id();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        if documents
            .iter()
            .any(|d| d.get(ID_FIELD) == document.get(ID_FIELD))
        {
            return Err(StoreError::DuplicateId(id));
        }

        documents.push(Value::Object(document));
        Ok(UpsertResult::inserted(id))
    }

    fn insert(&self, document: Value) -> StoreResult<String> {
        let mut document = match document {
            Value::Object(map) => map,
            other => {
                return Err(StoreError::InvalidDocument(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        let id = match document.get(ID_FIELD) {
            Some(id) => Self::id_string(id),
            None => {
                let id = Self::generate_id();
                document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut documents = self.write()?;
        if documents
            .iter()
            .any(|d| d.get(ID_FIELD) == document.get(ID_FIELD))
        {
            return Err(StoreError::DuplicateId(id));
        }

        documents.push(Value::Object(document));
        Ok(id)
    }

    fn count_all(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    fn create_index(&self, field: &str) -> StoreResult<()> {
        let mut indexes = self
            .indexes
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
        indexes.insert(field.to_string());
        Ok(())
    }

    fn indexes(&self) -> StoreResult<Vec<String>> {
        let indexes = self
            .indexes
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".into()))?;
        Ok(indexes.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projection;
    use crate::store::SortSpec;
    use serde_json::json;

    fn store() -> MemoryStore {
        MemoryStore::with_documents(vec![
            json!({"_id": "a", "title": "A", "kind": "book", "year": 2001}),
            json!({"_id": "b", "title": "B", "kind": "book", "year": 1999}),
            json!({"_id": "c", "title": "C", "kind": "magazine", "year": 2000}),
        ])
        .unwrap()
    }

    fn sel(value: Value) -> Selector {
        Selector::from(value)
    }

    #[test]
    fn test_find_in_insertion_order() {
        let cursor = store().find(&sel(json!({"kind": "book"})), &FindOptions::new()).unwrap();
        assert_eq!(cursor.pluck("title"), vec![json!("A"), json!("B")]);
    }

    #[test]
    fn test_find_sort_skip_limit() {
        let options = FindOptions::new()
            .with_sort(SortSpec::asc("year"))
            .with_skip(1)
            .with_limit(1);
        let cursor = store().find(&Selector::new(), &options).unwrap();
        assert_eq!(cursor.pluck("title"), vec![json!("C")]);
    }

    #[test]
    fn test_find_projection() {
        let options = FindOptions::new().with_fields(Projection::include(["title"]));
        let doc = store().find_one(&Selector::id("a"), &options).unwrap().unwrap();
        assert_eq!(doc, json!({"_id": "a", "title": "A"}));
    }

    #[test]
    fn test_identifier_selector_with_extra_constraint() {
        let store = store();
        let hit = store
            .find_one(&sel(json!({"_id": "c", "kind": "magazine"})), &FindOptions::new())
            .unwrap();
        let miss = store
            .find_one(&sel(json!({"_id": "c", "kind": "book"})), &FindOptions::new())
            .unwrap();

        assert!(hit.is_some());
        assert!(miss.is_none());
    }

    #[test]
    fn test_update_single_and_multi() {
        let store = store();
        let modifier = json!({"$set": {"tag": 1}});

        let single = store
            .update(&sel(json!({"kind": "book"})), &modifier, &UpdateOptions::single())
            .unwrap();
        assert_eq!(single, 1);

        let multi = store
            .update(&sel(json!({"kind": "book"})), &modifier, &UpdateOptions::multi())
            .unwrap();
        assert_eq!(multi, 2);
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let store = store();
        let result = store.update(
            &Selector::new(),
            &json!({"$inc": {"title": 1}}),
            &UpdateOptions::multi(),
        );
        assert!(matches!(result, Err(StoreError::InvalidModifier(_))));
        assert_eq!(store.snapshot().unwrap()[0]["title"], json!("A"));
    }

    #[test]
    fn test_remove() {
        let store = store();
        let removed = store.remove(&sel(json!({"kind": "book"}))).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count_all().unwrap(), 1);
    }

    #[test]
    fn test_upsert_updates_existing() {
        let store = store();
        let result = store
            .upsert(
                &sel(json!({"kind": "book"})),
                &json!({"$set": {"catalogId": 1}}),
                &UpdateOptions::multi(),
            )
            .unwrap();
        assert_eq!(result, UpsertResult::updated(2));
    }

    #[test]
    fn test_upsert_inserts_seeded_document() {
        let store = store();
        let result = store
            .upsert(
                &sel(json!({"kind": "pamphlet"})),
                &json!({"$set": {"catalogId": 1}}),
                &UpdateOptions::multi(),
            )
            .unwrap();

        assert_eq!(result.number_affected, 1);
        let id = result.inserted_id.unwrap();
        let doc = store.find_one(&Selector::id(id.as_str()), &FindOptions::new()).unwrap().unwrap();
        assert_eq!(doc["kind"], json!("pamphlet"));
        assert_eq!(doc["catalogId"], json!(1));
    }

    #[test]
    fn test_insert_generates_id_and_rejects_duplicates() {
        let store = MemoryStore::new();
        let id = store.insert(json!({"title": "X"})).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let dup = store.insert(json!({"_id": id.clone()}));
        assert!(matches!(dup, Err(StoreError::DuplicateId(_))));

        let bad = store.insert(json!("not a document"));
        assert!(matches!(bad, Err(StoreError::InvalidDocument(_))));
    }

    #[test]
    fn test_indexes_pass_through() {
        let store = MemoryStore::new();
        store.create_index("kind").unwrap();
        store.create_index("genre").unwrap();
        assert_eq!(store.indexes().unwrap(), vec!["genre".to_string(), "kind".to_string()]);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("books.json");

        store().save(&path).unwrap();
        let loaded = MemoryStore::load(&path).unwrap();

        assert_eq!(loaded.count_all().unwrap(), 3);
        assert_eq!(loaded.snapshot().unwrap(), store().snapshot().unwrap());
    }

    #[test]
    fn test_malformed_selector_rejected_on_empty_store() {
        let store = MemoryStore::new();
        let result = store.remove(&sel(json!([{"kind": "book"}])));
        assert!(matches!(result, Err(StoreError::MalformedSelector(_))));

        let result = store.upsert(&sel(json!(false)), &json!({"$set": {"a": 1}}), &UpdateOptions::default());
        assert!(matches!(result, Err(StoreError::MalformedSelector(_))));
        assert_eq!(store.count_all().unwrap(), 0);
    }
}
