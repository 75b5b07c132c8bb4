//! Result sorting
//!
//! Multi-key, stable and deterministic.

use std::cmp::Ordering;

use serde_json::Value;

use super::options::{SortDirection, SortSpec};
use super::path::lookup;

/// Sorts result documents
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts documents by `specs`, most significant key first.
    pub fn sort(documents: &mut [Value], specs: &[SortSpec]) {
        if specs.is_empty() {
            return;
        }

        documents.sort_by(|a, b| {
            for spec in specs {
                let ordering = Self::compare_values(lookup(a, &spec.field), lookup(b, &spec.field));
                let ordering = match spec.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Compares two JSON values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < string < array < object
    /// - For same types, natural ordering
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);

                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                    (Value::Number(_), Value::Number(_)) | (Value::String(_), Value::String(_)) => {
                        super::matcher::compare_values(a_val, b_val).unwrap_or(Ordering::Equal)
                    }
                    _ => Ordering::Equal,
                }
            }
        }
    }
}
