//! Projection merging
//!
//! Folds the caller's projection with every ancestor projection, nearest
//! first. Fields are dot-separated paths; a path covers itself and every
//! path beneath it. Per field, across each pair of maps:
//!
//! - Included in one map: kept only if the other map includes nothing, or
//!   includes the same path or one covering it.
//! - Excluded in either: excluded. Exclusion is sticky; no level can
//!   include a field another level excluded.
//!
//! Finishing: once any map contributed an inclusion the result is an
//! inclusion projection. An included path is dropped when an exclusion
//! covers it. An exclusion nested under a kept inclusion stays, so the
//! store prunes it from the included subtree. `_id: 0` stays. Other
//! exclusions are stripped. An inclusion projection narrowed down to
//! nothing becomes `{ "_id": 1 }`, or `Projection::nothing()` when `_id`
//! itself is excluded.

use crate::selector::ID_FIELD;

use super::types::{covers, FieldMode, Projection};

/// True if `map` lets `path` through its inclusions
fn admits(map: &Projection, path: &str) -> bool {
    !map.has_inclusions()
        || map
            .fields_with(FieldMode::Include)
            .any(|included| covers(included, path))
}

/// Merges two projection maps.
pub fn merge_pair(inner: &Projection, outer: &Projection) -> Projection {
    let mut merged = Projection::new();

    for (field, mode) in inner.iter() {
        match mode {
            FieldMode::Include => {
                if admits(outer, field) {
                    merged.set(field.clone(), FieldMode::Include);
                }
            }
            FieldMode::Exclude => merged.set(field.clone(), FieldMode::Exclude),
        }
    }

    for (field, mode) in outer.iter() {
        match mode {
            FieldMode::Include => {
                if admits(inner, field) && merged.get(field).is_none() {
                    merged.set(field.clone(), FieldMode::Include);
                }
            }
            FieldMode::Exclude => merged.set(field.clone(), FieldMode::Exclude),
        }
    }

    merged
}

/// Resolves a merged map into inclusion mode without returning any
/// excluded path.
fn into_inclusion(fields: Projection) -> Projection {
    let excluded: Vec<&str> = fields.fields_with(FieldMode::Exclude).collect();

    let included: Vec<&str> = fields
        .fields_with(FieldMode::Include)
        .filter(|path| !excluded.iter().any(|e| covers(e, path)))
        .collect();

    let nested: Vec<&str> = excluded
        .iter()
        .copied()
        .filter(|e| included.iter().any(|p| covers(p, e)))
        .collect();

    let id_hidden = fields.get(ID_FIELD) == Some(FieldMode::Exclude);

    if included.is_empty() {
        return if id_hidden {
            Projection::nothing()
        } else {
            Projection::include([ID_FIELD])
        };
    }

    let mut result = Projection::include(included);
    for path in nested {
        result.set(path, FieldMode::Exclude);
    }
    if id_hidden {
        result.set(ID_FIELD, FieldMode::Exclude);
    }
    result
}

/// Running state of a projection fold
#[derive(Debug, Clone, Default)]
pub struct ProjectionFold {
    fields: Option<Projection>,
    inclusive: bool,
}

impl ProjectionFold {
    /// Starts a fold from the caller's projection (if any)
    pub fn new(caller: Option<Projection>) -> Self {
        let inclusive = caller.as_ref().map(Projection::is_inclusion).unwrap_or(false);
        Self {
            fields: caller,
            inclusive,
        }
    }

    /// Narrows the accumulator with the next, more ancestral, level
    pub fn narrow(&mut self, level: &Projection) {
        self.inclusive |= level.is_inclusion();
        self.fields = Some(match self.fields.take() {
            Some(acc) => merge_pair(&acc, level),
            None => level.clone(),
        });
    }

    /// True once any folded map included a field
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// Produces the effective projection. `None` means no projection was
    /// ever specified (or only an empty one) and all fields are returned.
    pub fn finish(self) -> Option<Projection> {
        let fields = self.fields?;

        if self.inclusive {
            return Some(into_inclusion(fields));
        }

        if fields.is_empty() {
            None
        } else {
            Some(fields)
        }
    }
}

/// Folds the caller's projection with `levels`, nearest first.
pub fn merge_projections<'a, I>(caller: Option<Projection>, levels: I) -> Option<Projection>
where
    I: IntoIterator<Item = &'a Projection>,
{
    let mut fold = ProjectionFold::new(caller);
    for level in levels {
        fold.narrow(level);
    }
    fold.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inc(fields: &[&str]) -> Projection {
        Projection::include(fields.iter().copied())
    }

    fn exc(fields: &[&str]) -> Projection {
        Projection::exclude(fields.iter().copied())
    }

    #[test]
    fn test_no_projection_anywhere() {
        assert_eq!(merge_projections(None, Vec::<&Projection>::new()), None);
    }

    #[test]
    fn test_single_level_inclusion() {
        let level = inc(&["title"]);
        assert_eq!(merge_projections(None, [&level]), Some(inc(&["title"])));
    }

    #[test]
    fn test_inclusions_intersect() {
        let outer = inc(&["genre", "title"]);
        let result = merge_projections(Some(inc(&["genre"])), [&outer]);
        assert_eq!(result, Some(inc(&["genre"])));
    }

    #[test]
    fn test_disjoint_inclusions_leave_only_id() {
        let child = inc(&["kind"]);
        let root = inc(&["title"]);
        let result = merge_projections(None, [&child, &root]);
        assert_eq!(result, Some(inc(&["_id"])));
    }

    #[test]
    fn test_exclusions_accumulate() {
        let child = exc(&["genre"]);
        let root = exc(&["kind"]);
        let result = merge_projections(None, [&child, &root]);
        assert_eq!(result, Some(exc(&["genre", "kind"])));
    }

    #[test]
    fn test_inclusion_strips_exclusions() {
        let child = inc(&["title"]);
        let root = exc(&["catalogId"]);
        let result = merge_projections(None, [&child, &root]);
        assert_eq!(result, Some(inc(&["title"])));
    }

    #[test]
    fn test_exclusion_is_sticky_against_nearer_inclusion() {
        let child = inc(&["x"]);
        let root = exc(&["x"]);
        let result = merge_projections(None, [&child, &root]);
        assert_eq!(result, Some(inc(&["_id"])));
    }

    #[test]
    fn test_exclusion_is_sticky_against_ancestral_inclusion() {
        let root = inc(&["x", "y"]);
        let result = merge_projections(Some(exc(&["x"])), [&root]);
        assert_eq!(result, Some(inc(&["y"])));
    }

    #[test]
    fn test_caller_exclusion_with_ancestral_exclusion() {
        let root = exc(&["kind"]);
        let result = merge_projections(Some(exc(&["genre"])), [&root]);
        assert_eq!(result, Some(exc(&["genre", "kind"])));
    }

    #[test]
    fn test_merge_pair_rules() {
        let merged = merge_pair(&inc(&["a", "b"]), &inc(&["b", "c"]));
        assert_eq!(merged, inc(&["b"]));

        let merged = merge_pair(&inc(&["a"]), &exc(&["b"]));
        assert_eq!(merged, inc(&["a"]).with("b", FieldMode::Exclude));

        let merged = merge_pair(&exc(&["a"]), &inc(&["a"]));
        assert_eq!(merged, exc(&["a"]));
    }

    #[test]
    fn test_inclusion_of_parent_keeps_nested_exclusion() {
        let root = exc(&["meta.secret"]);
        let result = merge_projections(Some(inc(&["meta"])), [&root]);
        assert_eq!(
            result,
            Some(inc(&["meta"]).with("meta.secret", FieldMode::Exclude))
        );
    }

    #[test]
    fn test_inclusion_under_excluded_parent_is_dropped() {
        let root = exc(&["meta"]);
        let result = merge_projections(Some(inc(&["meta.secret", "title"])), [&root]);
        assert_eq!(result, Some(inc(&["title"])));

        let result = merge_projections(Some(inc(&["meta.secret"])), [&root]);
        assert_eq!(result, Some(inc(&["_id"])));
    }

    #[test]
    fn test_nested_inclusions_intersect() {
        let root = inc(&["meta"]);
        let result = merge_projections(Some(inc(&["meta.public", "title"])), [&root]);
        assert_eq!(result, Some(inc(&["meta.public"])));
    }

    #[test]
    fn test_hidden_id_survives_inclusion() {
        let root = exc(&["_id"]);
        let result = merge_projections(Some(inc(&["title"])), [&root]);
        assert_eq!(result, Some(inc(&["title"]).with("_id", FieldMode::Exclude)));
    }

    #[test]
    fn test_hidden_id_with_emptied_inclusion() {
        let child = inc(&["title"]);
        let root = exc(&["_id", "title"]);
        let result = merge_projections(None, [&child, &root]).unwrap();
        assert_eq!(result, Projection::nothing());
        assert!(result.is_inclusion());
        assert_eq!(result.get("_id"), Some(FieldMode::Exclude));
    }

    #[test]
    fn test_empty_caller_projection() {
        assert_eq!(merge_projections(Some(Projection::new()), Vec::<&Projection>::new()), None);
    }
}
