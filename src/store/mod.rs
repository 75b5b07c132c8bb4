//! Document store
//!
//! The store owns durable documents and the meaning of selectors,
//! modifiers and projections. Views only rewrite selectors and options
//! before delegating here.
//!
//! `MemoryStore` is an in-memory implementation used by the CLI and tests.

mod cursor;
mod errors;
mod matcher;
mod memory;
mod modifier;
mod options;
mod path;
mod projector;
mod sorter;

use std::sync::Arc;

use serde_json::Value;

use crate::selector::Selector;

pub use cursor::Cursor;
pub use errors::{StoreError, StoreResult};
pub use matcher::SelectorMatcher;
pub use memory::MemoryStore;
pub use options::{FindOptions, SortDirection, SortSpec, UpdateOptions, UpsertResult};
pub use projector::project;

/// Collection-like operations a view delegates to
pub trait DocumentStore: Send + Sync {
    /// Returns every document matching `selector`
    fn find(&self, selector: &Selector, options: &FindOptions) -> StoreResult<Cursor>;

    /// Returns the first document matching `selector`
    fn find_one(&self, selector: &Selector, options: &FindOptions) -> StoreResult<Option<Value>> {
        let options = FindOptions {
            limit: Some(1),
            ..options.clone()
        };
        Ok(self.find(selector, &options)?.fetch().into_iter().next())
    }

    /// Applies `modifier` to matching documents, returning the count
    fn update(&self, selector: &Selector, modifier: &Value, options: &UpdateOptions)
        -> StoreResult<usize>;

    /// Removes matching documents, returning the count
    fn remove(&self, selector: &Selector) -> StoreResult<usize>;

    /// Updates matching documents, or inserts one if none match
    fn upsert(
        &self,
        selector: &Selector,
        modifier: &Value,
        options: &UpdateOptions,
    ) -> StoreResult<UpsertResult>;

    /// Inserts a new document, returning its id
    fn insert(&self, document: Value) -> StoreResult<String>;

    /// Number of documents in the whole collection
    fn count_all(&self) -> StoreResult<usize>;

    /// Declares an index on `field`
    fn create_index(&self, field: &str) -> StoreResult<()>;

    /// Declared index fields
    fn indexes(&self) -> StoreResult<Vec<String>>;
}

/// Shared handle to a store; every view over it holds a clone
pub type SharedStore = Arc<dyn DocumentStore>;
