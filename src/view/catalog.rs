//! Named collections and views
//!
//! A view definition names its source. The source must already be a
//! registered collection or a defined view; anything else is rejected
//! with `ViewError::InvalidSource`.

use std::collections::BTreeMap;

use crate::projection::Projection;
use crate::store::SharedStore;

use super::errors::{ViewError, ViewResult};
use super::predicate::Predicate;
use super::view::View;

/// A source a view can be defined over
#[derive(Clone)]
pub enum Source {
    Collection(SharedStore),
    View(View),
}

/// Registry of named collections and the views defined over them
#[derive(Default)]
pub struct ViewCatalog {
    collections: BTreeMap<String, SharedStore>,
    views: BTreeMap<String, View>,
}

impl ViewCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collection under `name`
    pub fn register_collection(
        &mut self,
        name: impl Into<String>,
        store: SharedStore,
    ) -> ViewResult<()> {
        let name = name.into();
        if self.is_defined(&name) {
            return Err(ViewError::DuplicateView(name));
        }
        self.collections.insert(name, store);
        Ok(())
    }

    /// Defines view `name` over `source`. Names are unique across views
    /// and collections.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        source: &str,
        predicate: Option<Predicate>,
        projection: Option<Projection>,
    ) -> ViewResult<View> {
        let name = name.into();
        if self.is_defined(&name) {
            return Err(ViewError::DuplicateView(name));
        }

        let view = match self.resolve(source)? {
            Source::View(parent) => parent.derive(predicate, projection),
            Source::Collection(store) => View::root(store, predicate, projection),
        };

        self.views.insert(name, view.clone());
        Ok(view)
    }

    /// Looks up `name` as a view, then as a collection
    pub fn resolve(&self, name: &str) -> ViewResult<Source> {
        if let Some(view) = self.views.get(name) {
            return Ok(Source::View(view.clone()));
        }
        if let Some(store) = self.collections.get(name) {
            return Ok(Source::Collection(store.clone()));
        }
        Err(ViewError::InvalidSource(name.to_string()))
    }

    /// Defined view by name
    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(name)
    }

    /// Readable handle for `name`: the view itself, or an unnarrowed view
    /// over the collection
    pub fn open(&self, name: &str) -> ViewResult<View> {
        Ok(match self.resolve(name)? {
            Source::View(view) => view,
            Source::Collection(store) => View::over(store),
        })
    }

    pub fn view_names(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    fn is_defined(&self, name: &str) -> bool {
        self.views.contains_key(name) || self.collections.contains_key(name)
    }
}
