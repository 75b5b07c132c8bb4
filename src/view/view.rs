//! Scoped views over a document store

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::projection::Projection;
use crate::selector::Selector;
use crate::store::{
    Cursor, FindOptions, SharedStore, StoreResult, UpdateOptions, UpsertResult,
};

use super::merge::{advise_ignored_projection, merge_options, merge_projection, merge_selector};
use super::predicate::Predicate;

/// A narrowed handle onto a store or onto another view.
///
/// Cloning is cheap; clones share the same node. A view holds its parent
/// and the store by shared reference and owns no documents.
#[derive(Clone)]
pub struct View {
    node: Arc<ViewNode>,
}

struct ViewNode {
    store: SharedStore,
    parent: Option<View>,
    predicate: Option<Predicate>,
    projection: Option<Projection>,
}

/// Effective selector and options for a read through a view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub selector: Selector,
    pub options: FindOptions,
}

/// Derives narrowed views
pub trait Scope {
    /// Narrows by `predicate`
    fn scope(&self, predicate: impl Into<Predicate>) -> View;

    /// Narrows by `predicate` and restricts returned fields to `fields`
    fn scope_with_fields(&self, predicate: impl Into<Predicate>, fields: Projection) -> View;
}

impl View {
    /// Unnarrowed view over `store`
    pub fn over(store: SharedStore) -> Self {
        Self::from_parts(store, None, None, None)
    }

    /// View over `store` with narrowing of its own and no parent view
    pub(crate) fn root(
        store: SharedStore,
        predicate: Option<Predicate>,
        projection: Option<Projection>,
    ) -> Self {
        Self::from_parts(store, None, predicate, projection)
    }

    fn from_parts(
        store: SharedStore,
        parent: Option<View>,
        predicate: Option<Predicate>,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            node: Arc::new(ViewNode {
                store,
                parent,
                predicate,
                projection,
            }),
        }
    }

    /// Child view with optional narrowing of either kind.
    ///
    /// A child with neither applies exactly its ancestors' narrowing.
    pub fn derive(&self, predicate: Option<Predicate>, projection: Option<Projection>) -> View {
        Self::from_parts(
            Arc::clone(&self.node.store),
            Some(self.clone()),
            predicate,
            projection,
        )
    }

    /// Child view restricting only the returned fields
    pub fn with_fields(&self, fields: Projection) -> View {
        self.derive(None, Some(fields))
    }

    pub fn store(&self) -> &SharedStore {
        &self.node.store
    }

    pub fn parent(&self) -> Option<&View> {
        self.node.parent.as_ref()
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.node.predicate.as_ref()
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.node.projection.as_ref()
    }

    /// This view followed by each ancestor, up to the root
    pub fn ancestry(&self) -> Ancestry<'_> {
        Ancestry { next: Some(self) }
    }

    /// Number of views in the chain, this one included
    pub fn depth(&self) -> usize {
        self.ancestry().count()
    }

    /// True if both handles are the same view
    pub fn same_view(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Resolves the effective selector and options without touching the
    /// store. Dynamic predicates are evaluated now.
    pub fn explain(&self, selector: impl Into<Selector>, options: FindOptions) -> Explanation {
        Explanation {
            selector: merge_selector(self, selector.into()),
            options: merge_options(self, options),
        }
    }

    /// Projection the view would apply to a read with no caller fields.
    ///
    /// Mutations ignore it; `update`, `remove` and `upsert` log a warning
    /// when it is set.
    pub fn ignored_projection(&self) -> Option<Projection> {
        merge_projection(self, None)
    }

    // ==================
    // Reads
    // ==================

    /// Documents matching `selector` within this view
    pub fn find(&self, selector: impl Into<Selector>, options: FindOptions) -> StoreResult<Cursor> {
        let selector = merge_selector(self, selector.into());
        let options = merge_options(self, options);
        self.store().find(&selector, &options)
    }

    /// First document matching `selector` within this view
    pub fn find_one(
        &self,
        selector: impl Into<Selector>,
        options: FindOptions,
    ) -> StoreResult<Option<Value>> {
        let selector = merge_selector(self, selector.into());
        let options = merge_options(self, options);
        self.store().find_one(&selector, &options)
    }

    // ==================
    // Mutations
    // ==================

    /// Updates documents matching `selector` within this view
    pub fn update(
        &self,
        selector: impl Into<Selector>,
        modifier: &Value,
        options: UpdateOptions,
    ) -> StoreResult<usize> {
        advise_ignored_projection(self, "update");
        let selector = merge_selector(self, selector.into());
        self.store().update(&selector, modifier, &options)
    }

    /// Removes documents matching `selector` within this view
    pub fn remove(&self, selector: impl Into<Selector>) -> StoreResult<usize> {
        advise_ignored_projection(self, "remove");
        let selector = merge_selector(self, selector.into());
        self.store().remove(&selector)
    }

    /// Updates documents matching `selector` within this view, or inserts
    /// one built by the store from the merged selector and `modifier`
    pub fn upsert(
        &self,
        selector: impl Into<Selector>,
        modifier: &Value,
        options: UpdateOptions,
    ) -> StoreResult<UpsertResult> {
        advise_ignored_projection(self, "upsert");
        let selector = merge_selector(self, selector.into());
        self.store().upsert(&selector, modifier, &options)
    }

    // ==================
    // Pass-through
    // ==================

    /// Inserts a new document into the store, unnarrowed
    pub fn insert(&self, document: Value) -> StoreResult<String> {
        self.store().insert(document)
    }

    /// Size of the whole underlying collection, unnarrowed
    pub fn count_all(&self) -> StoreResult<usize> {
        self.store().count_all()
    }

    pub fn create_index(&self, field: &str) -> StoreResult<()> {
        self.store().create_index(field)
    }

    pub fn indexes(&self) -> StoreResult<Vec<String>> {
        self.store().indexes()
    }
}

impl Scope for View {
    fn scope(&self, predicate: impl Into<Predicate>) -> View {
        self.derive(Some(predicate.into()), None)
    }

    fn scope_with_fields(&self, predicate: impl Into<Predicate>, fields: Projection) -> View {
        self.derive(Some(predicate.into()), Some(fields))
    }
}

impl Scope for SharedStore {
    fn scope(&self, predicate: impl Into<Predicate>) -> View {
        View::root(Arc::clone(self), Some(predicate.into()), None)
    }

    fn scope_with_fields(&self, predicate: impl Into<Predicate>, fields: Projection) -> View {
        View::root(Arc::clone(self), Some(predicate.into()), Some(fields))
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("depth", &self.depth())
            .field("predicate", &self.node.predicate)
            .field("projection", &self.node.projection)
            .finish()
    }
}

/// Iterator over a view and its ancestors, nearest first
pub struct Ancestry<'a> {
    next: Option<&'a View>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a View;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
