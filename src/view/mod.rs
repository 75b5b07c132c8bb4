//! Scoped views
//!
//! A `View` narrows a store, or another view, by a predicate and
//! optionally a field projection. Chains of views merge on every call:
//!
//! - Selectors are conjoined, so a view only ever sees a subset of its
//!   parent's documents, whatever the caller passes.
//! - Projections are merged so a view never returns a field any level
//!   excluded or left out of an inclusion list.
//!
//! Mutations apply the merged selector but cannot honor a projection; if
//! the chain has one a `VIEW_PROJECTION_IGNORED` warning is logged and the
//! mutation proceeds.

mod catalog;
mod errors;
mod merge;
mod predicate;
#[allow(clippy::module_inception)]
mod view;

pub use catalog::{Source, ViewCatalog};
pub use errors::{ViewError, ViewResult};
pub use merge::{merge_options, merge_projection, merge_selector};
pub use predicate::{Predicate, PredicateFn};
pub use view::{Ancestry, Explanation, Scope, View};
