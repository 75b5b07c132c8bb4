//! # Publication Registry
//!
//! Named publications of view queries.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::observability::Logger;
use crate::selector::Selector;
use crate::store::{Cursor, FindOptions};
use crate::view::{View, ViewError, ViewResult};

use super::publication::Publication;

/// Registry of publications, keyed by name
#[derive(Debug, Default)]
pub struct PublicationRegistry {
    by_name: RwLock<HashMap<String, Arc<Publication>>>,
}

impl PublicationRegistry {
    /// Create a new registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `view`'s query under `name`
    pub fn publish(
        &self,
        name: impl Into<String>,
        view: &View,
        selector: impl Into<Selector>,
        options: FindOptions,
    ) -> ViewResult<Arc<Publication>> {
        let name = name.into();
        let mut by_name = self
            .by_name
            .write()
            .map_err(|_| ViewError::Internal("Lock poisoned".into()))?;

        if by_name.contains_key(&name) {
            return Err(ViewError::DuplicatePublication(name));
        }

        let publication = Arc::new(Publication::new(name.clone(), view.clone(), selector, options));
        by_name.insert(name.clone(), Arc::clone(&publication));

        Logger::info(
            "PUBLICATION_REGISTERED",
            &[("id", publication.id()), ("name", &name)],
        );

        Ok(publication)
    }

    /// Removes a publication
    pub fn unpublish(&self, name: &str) -> ViewResult<Arc<Publication>> {
        let removed = {
            let mut by_name = self
                .by_name
                .write()
                .map_err(|_| ViewError::Internal("Lock poisoned".into()))?;
            by_name.remove(name)
        };

        match removed {
            Some(publication) => {
                Logger::info(
                    "PUBLICATION_REMOVED",
                    &[("id", publication.id()), ("name", name)],
                );
                Ok(publication)
            }
            None => Err(ViewError::UnknownPublication(name.to_string())),
        }
    }

    /// Get a publication by name
    pub fn get(&self, name: &str) -> Option<Arc<Publication>> {
        self.by_name.read().ok()?.get(name).cloned()
    }

    /// Polls the named publication
    pub fn poll(&self, name: &str) -> ViewResult<Cursor> {
        let publication = self
            .get(name)
            .ok_or_else(|| ViewError::UnknownPublication(name.to_string()))?;
        Ok(publication.poll()?)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .by_name
            .read()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Get publication count
    pub fn len(&self) -> usize {
        self.by_name.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
