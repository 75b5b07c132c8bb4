//! Selector conjunction
//!
//! Combines resolved selectors, nearest first, into one selector that
//! matches exactly the documents matching every input.
//!
//! The first selector to name a key owns it. A later selector naming the
//! same key with a different constraint is appended to the top-level
//! `$and` array rather than overwriting, so no level can widen another.
//! Identical constraints are kept once.

use serde_json::{Map, Value};

use super::types::Selector;
use super::AND_OPERATOR;

/// Conjoins `levels` into a single selector.
pub fn conjoin<I>(levels: I) -> Selector
where
    I: IntoIterator<Item = Selector>,
{
    let mut merged = Map::new();
    let mut conjuncts: Vec<Value> = Vec::new();

    for level in levels {
        for (key, constraint) in level.into_map() {
            if key == AND_OPERATOR {
                match constraint {
                    Value::Array(items) => {
                        for item in items {
                            push_unique(&mut conjuncts, item);
                        }
                    }
                    // Malformed; left for the store to reject.
                    other => push_unique(&mut conjuncts, single(AND_OPERATOR, other)),
                }
                continue;
            }

            match merged.get(&key) {
                None => {
                    merged.insert(key, constraint);
                }
                Some(existing) if *existing == constraint => {}
                Some(_) => push_unique(&mut conjuncts, single(&key, constraint)),
            }
        }
    }

    if !conjuncts.is_empty() {
        merged.insert(AND_OPERATOR.to_string(), Value::Array(conjuncts));
    }

    Selector::from(merged)
}

fn single(key: &str, constraint: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), constraint);
    Value::Object(map)
}

fn push_unique(conjuncts: &mut Vec<Value>, item: Value) {
    if !conjuncts.contains(&item) {
        conjuncts.push(item);
    }
}
