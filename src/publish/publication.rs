//! A named, pollable query through a view

use uuid::Uuid;

use crate::selector::Selector;
use crate::store::{Cursor, FindOptions, StoreResult};
use crate::view::{Explanation, View};

/// A view's query registered under a name.
///
/// Stores the caller's selector and options unmerged. Each poll merges
/// them with the view chain again, so dynamic predicates are evaluated
/// per poll and never frozen at publish time.
#[derive(Debug, Clone)]
pub struct Publication {
    id: String,
    name: String,
    view: View,
    selector: Selector,
    options: FindOptions,
}

impl Publication {
    pub fn new(
        name: impl Into<String>,
        view: View,
        selector: impl Into<Selector>,
        options: FindOptions,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            view,
            selector: selector.into(),
            options,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// Effective query as of now
    pub fn query(&self) -> Explanation {
        self.view.explain(self.selector.clone(), self.options.clone())
    }

    /// Runs the query against the store
    pub fn poll(&self) -> StoreResult<Cursor> {
        self.view.find(self.selector.clone(), self.options.clone())
    }
}
