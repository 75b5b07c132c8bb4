//! Update modifiers and upsert seeding
//!
//! A modifier is either an operator document (`$set`, `$unset`, `$inc`)
//! or a replacement document. A replacement keeps the target's `_id`.

use serde_json::{Map, Number, Value};

use crate::selector::{Selector, ID_FIELD};

use super::errors::{StoreError, StoreResult};
use super::path::{lookup_map, remove_path, set_path};

/// Applies a modifier to a document in place
pub fn apply_modifier(document: &mut Map<String, Value>, modifier: &Value) -> StoreResult<()> {
    let ops = modifier
        .as_object()
        .ok_or_else(|| StoreError::InvalidModifier("modifier must be an object".to_string()))?;

    let operator_count = ops.keys().filter(|k| k.starts_with('$')).count();

    if operator_count == 0 {
        return replace(document, ops);
    }
    if operator_count != ops.len() {
        return Err(StoreError::InvalidModifier(
            "cannot mix update operators with replacement fields".to_string(),
        ));
    }

    for (op, fields) in ops {
        let fields = fields.as_object().ok_or_else(|| {
            StoreError::InvalidModifier(format!("{} requires an object", op))
        })?;

        for (path, operand) in fields {
            if path == ID_FIELD {
                guard_id(document, operand, op)?;
            }

            match op.as_str() {
                "$set" => set_checked(document, path, operand.clone())?,
                "$unset" => {
                    remove_path(document, path);
                }
                "$inc" => increment(document, path, operand)?,
                other => {
                    return Err(StoreError::InvalidModifier(format!(
                        "unsupported operator {}",
                        other
                    )))
                }
            }
        }
    }

    Ok(())
}

fn replace(document: &mut Map<String, Value>, replacement: &Map<String, Value>) -> StoreResult<()> {
    let id = document.get(ID_FIELD).cloned();

    if let (Some(existing), Some(requested)) = (&id, replacement.get(ID_FIELD)) {
        if existing != requested {
            return Err(StoreError::InvalidModifier("cannot change _id".to_string()));
        }
    }

    let mut next = replacement.clone();
    if let Some(id) = id {
        next.insert(ID_FIELD.to_string(), id);
    }
    *document = next;
    Ok(())
}

fn guard_id(document: &Map<String, Value>, operand: &Value, op: &str) -> StoreResult<()> {
    match document.get(ID_FIELD) {
        Some(existing) if op == "$set" && existing == operand => Ok(()),
        None if op == "$set" => Ok(()),
        _ => Err(StoreError::InvalidModifier("cannot change _id".to_string())),
    }
}

fn set_checked(document: &mut Map<String, Value>, path: &str, value: Value) -> StoreResult<()> {
    if set_path(document, path, value) {
        Ok(())
    } else {
        Err(StoreError::InvalidModifier(format!(
            "cannot set {}: parent is not an object",
            path
        )))
    }
}

fn increment(document: &mut Map<String, Value>, path: &str, by: &Value) -> StoreResult<()> {
    let by = match by {
        Value::Number(n) => n,
        _ => {
            return Err(StoreError::InvalidModifier(format!(
                "$inc on {} requires a number",
                path
            )))
        }
    };

    let current = lookup_map(document, path).cloned();

    let next = match current {
        None => Value::Number(by.clone()),
        Some(Value::Number(n)) => add_numbers(&n, by).ok_or_else(|| {
            StoreError::InvalidModifier(format!("$inc on {} overflowed", path))
        })?,
        Some(_) => {
            return Err(StoreError::InvalidModifier(format!(
                "$inc on {} requires a numeric field",
                path
            )))
        }
    };

    set_checked(document, path, next)
}

fn add_numbers(a: &Number, b: &Number) -> Option<Value> {
    if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
        return ai.checked_add(bi).map(Value::from);
    }
    let sum = a.as_f64()? + b.as_f64()?;
    Number::from_f64(sum).map(Value::Number)
}

/// Builds the initial document for an upsert insert from the selector's
/// literal equality constraints, including those inside top-level `$and`.
pub fn upsert_seed(selector: &Selector) -> Map<String, Value> {
    let mut seed = Map::new();
    seed_from(&mut seed, selector.as_map());
    seed
}

fn seed_from(seed: &mut Map<String, Value>, constraints: &Map<String, Value>) {
    for (key, constraint) in constraints {
        if key.starts_with('$') {
            continue;
        }

        let literal = match constraint {
            Value::Object(ops) if !ops.is_empty() && ops.keys().all(|k| k.starts_with('$')) => {
                ops.get("$eq").cloned()
            }
            other => Some(other.clone()),
        };

        if let Some(value) = literal {
            // Conflicting constraints: the first one wins.
            if lookup_map(seed, key).is_none() {
                set_path(seed, key, value);
            }
        }
    }

    if let Some(clauses) = constraints.get("$and").and_then(Value::as_array) {
        for clause in clauses.iter().filter_map(Value::as_object) {
            seed_from(seed, clause);
        }
    }
}
