//! Merging a view chain with caller input
//!
//! Both mergers walk the chain from the view itself up to the root. They
//! are pure apart from evaluating dynamic predicates and trace logging,
//! and finish before the store is called.

use crate::observability::{Logger, Severity};
use crate::projection::{merge_projections, Projection};
use crate::selector::{conjoin, Selector};
use crate::store::FindOptions;

use super::predicate::Predicate;
use super::view::View;

/// Intersects the caller's selector with every predicate in the chain.
///
/// Dynamic predicates are evaluated here, on every call.
pub fn merge_selector(view: &View, caller: Selector) -> Selector {
    let narrowing = view
        .ancestry()
        .filter_map(|level| level.predicate().map(Predicate::resolve));

    let merged = conjoin(std::iter::once(caller).chain(narrowing));

    if Logger::enabled(Severity::Trace) {
        let selector = serde_json::to_string(&merged).unwrap_or_default();
        Logger::trace(
            "VIEW_SELECTOR_MERGED",
            &[("depth", &view.depth().to_string()), ("selector", &selector)],
        );
    }

    merged
}

/// Folds the caller's projection with every projection in the chain
pub fn merge_projection(view: &View, caller: Option<Projection>) -> Option<Projection> {
    merge_projections(caller, view.ancestry().filter_map(View::projection))
}

/// Merges `options.fields`; every other option passes through unchanged
pub fn merge_options(view: &View, mut options: FindOptions) -> FindOptions {
    options.fields = merge_projection(view, options.fields.take());
    options
}

/// Warns when the chain carries a projection a mutation cannot honor
pub(crate) fn advise_ignored_projection(view: &View, operation: &str) {
    if let Some(fields) = view.ignored_projection() {
        let fields = serde_json::to_string(&fields).unwrap_or_default();
        Logger::warn(
            "VIEW_PROJECTION_IGNORED",
            &[("fields", &fields), ("operation", operation)],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SharedStore};
    use crate::view::Scope;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn store() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_unnarrowed_view_keeps_caller_selector() {
        let view = View::over(store());
        let merged = merge_selector(&view, Selector::from(json!({"genre": "fiction"})));
        assert_eq!(merged.to_value(), json!({"genre": "fiction"}));
    }

    #[test]
    fn test_identifier_shorthand_is_narrowed() {
        let view = store().scope(json!({"kind": "book"}));
        let merged = merge_selector(&view, Selector::from("abc"));
        assert_eq!(merged.to_value(), json!({"_id": "abc", "kind": "book"}));
    }

    #[test]
    fn test_chain_is_conjoined() {
        let view = store()
            .scope(json!({"kind": "leaflet"}))
            .scope(json!({"genre": "cooking"}))
            .scope(json!({"year": 1999}));

        let merged = merge_selector(&view, Selector::new());
        assert_eq!(
            merged.to_value(),
            json!({"kind": "leaflet", "genre": "cooking", "year": 1999})
        );
    }

    #[test]
    fn test_caller_cannot_override_narrowing() {
        let view = store().scope(json!({"kind": "book"}));
        let merged = merge_selector(&view, Selector::from(json!({"kind": "magazine"})));

        assert_eq!(
            merged.to_value(),
            json!({"kind": "magazine", "$and": [{"kind": "book"}]})
        );
    }

    #[test]
    fn test_nearer_scope_owns_key_ancestor_is_conjoined() {
        let view = store()
            .scope(json!({"year": {"$gte": 1990}}))
            .scope(json!({"year": {"$lt": 2000}}));

        let merged = merge_selector(&view, Selector::new());
        assert_eq!(
            merged.to_value(),
            json!({"year": {"$lt": 2000}, "$and": [{"year": {"$gte": 1990}}]})
        );
    }

    #[test]
    fn test_dynamic_predicate_follows_state() {
        let genre = Arc::new(Mutex::new(None::<String>));
        let source = Arc::clone(&genre);
        let view = store().scope(Predicate::dynamic(move || {
            let genre = source.lock().unwrap().clone();
            json!({ "genre": genre })
        }));

        assert_eq!(merge_selector(&view, Selector::new()).to_value(), json!({"genre": null}));

        *genre.lock().unwrap() = Some("science".to_string());
        assert_eq!(
            merge_selector(&view, Selector::new()).to_value(),
            json!({"genre": "science"})
        );
    }

    #[test]
    fn test_merge_options_passes_other_fields() {
        let view = store().scope_with_fields(json!({}), Projection::exclude(["kind"]));
        let options = FindOptions::new()
            .with_fields(Projection::exclude(["genre"]))
            .with_limit(3)
            .with_skip(1);

        let merged = merge_options(&view, options);
        assert_eq!(merged.fields, Some(Projection::exclude(["genre", "kind"])));
        assert_eq!(merged.limit, Some(3));
        assert_eq!(merged.skip, Some(1));
    }
}
