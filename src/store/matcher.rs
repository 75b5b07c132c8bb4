//! Selector matching for the in-memory store
//!
//! Supported:
//! - Literal equality (an array field matches if any element is equal)
//! - `$eq $ne $gt $gte $lt $lte $in $nin $exists $not $regex/$options`
//! - Top-level `$and $or $nor`
//!
//! Ordering comparisons only hold between two numbers or two strings.
//! Anything else fails loudly with a `StoreError`.

use std::cmp::Ordering;

use regex::Regex;
use serde_json::Value;

use crate::selector::Selector;

use super::errors::{StoreError, StoreResult};
use super::path::lookup;

/// Evaluates selectors against documents
pub struct SelectorMatcher;

impl SelectorMatcher {
    /// Rejects a selector built from a value that was neither an object
    /// nor an identifier
    pub fn check(selector: &Selector) -> StoreResult<()> {
        match selector.malformed() {
            Some(value) => Err(StoreError::MalformedSelector(format!(
                "expected an object or identifier, got {}",
                value
            ))),
            None => Ok(()),
        }
    }

    /// Checks if a document matches every constraint of the selector
    pub fn matches(document: &Value, selector: &Selector) -> StoreResult<bool> {
        Self::check(selector)?;

        for (key, constraint) in selector.iter() {
            let matched = match key.as_str() {
                "$and" => {
                    let mut all = true;
                    for clause in Self::clauses(key, constraint)? {
                        if !Self::matches(document, &clause)? {
                            all = false;
                            break;
                        }
                    }
                    all
                }
                "$or" => Self::any_clause(document, key, constraint)?,
                "$nor" => !Self::any_clause(document, key, constraint)?,
                op if op.starts_with('$') => {
                    return Err(StoreError::UnknownOperator(op.to_string()));
                }
                path => Self::matches_field(lookup(document, path), constraint)?,
            };

            if !matched {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn any_clause(document: &Value, key: &str, constraint: &Value) -> StoreResult<bool> {
        for clause in Self::clauses(key, constraint)? {
            if Self::matches(document, &clause)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn clauses(key: &str, constraint: &Value) -> StoreResult<Vec<Selector>> {
        let items = constraint.as_array().ok_or_else(|| {
            StoreError::MalformedSelector(format!("{} requires an array", key))
        })?;

        items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Ok(Selector::from(map.clone())),
                other => Err(StoreError::MalformedSelector(format!(
                    "{} clause must be an object, got {}",
                    key, other
                ))),
            })
            .collect()
    }

    /// True if `constraint` is an operator document like `{"$gt": 1}`
    fn is_operator_document(constraint: &Value) -> bool {
        match constraint {
            Value::Object(map) => !map.is_empty() && map.keys().all(|k| k.starts_with('$')),
            _ => false,
        }
    }

    fn matches_field(value: Option<&Value>, constraint: &Value) -> StoreResult<bool> {
        let operators = match constraint {
            Value::Object(map) if Self::is_operator_document(constraint) => map,
            _ => return Ok(Self::equals(value, constraint)),
        };

        for (op, operand) in operators {
            let matched = match op.as_str() {
                "$eq" => Self::equals(value, operand),
                "$ne" => !Self::equals(value, operand),
                "$gt" => Self::compare_any(value, operand, |o| o == Ordering::Greater),
                "$gte" => Self::compare_any(value, operand, |o| o != Ordering::Less),
                "$lt" => Self::compare_any(value, operand, |o| o == Ordering::Less),
                "$lte" => Self::compare_any(value, operand, |o| o != Ordering::Greater),
                "$in" => Self::in_list(value, op, operand)?,
                "$nin" => !Self::in_list(value, op, operand)?,
                "$exists" => {
                    let wanted = operand.as_bool().ok_or_else(|| {
                        StoreError::MalformedSelector("$exists requires a boolean".to_string())
                    })?;
                    value.is_some() == wanted
                }
                "$not" => !Self::matches_field(value, operand)?,
                "$regex" => {
                    let flags = operators.get("$options").and_then(Value::as_str);
                    Self::regex_match(value, operand, flags)?
                }
                // Consumed by $regex
                "$options" => true,
                other => return Err(StoreError::UnknownOperator(other.to_string())),
            };

            if !matched {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Equality with array-contains; a missing field equals `null`
    fn equals(value: Option<&Value>, expected: &Value) -> bool {
        match value {
            None => expected.is_null(),
            Some(actual) if actual == expected => true,
            Some(Value::Array(items)) => items.contains(expected),
            Some(_) => false,
        }
    }

    fn in_list(value: Option<&Value>, op: &str, operand: &Value) -> StoreResult<bool> {
        let candidates = operand
            .as_array()
            .ok_or_else(|| StoreError::MalformedSelector(format!("{} requires an array", op)))?;
        Ok(candidates.iter().any(|c| Self::equals(value, c)))
    }

    fn compare_any<F>(value: Option<&Value>, bound: &Value, accept: F) -> bool
    where
        F: Fn(Ordering) -> bool,
    {
        match value {
            None => false,
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| compare_values(item, bound).map(&accept).unwrap_or(false)),
            Some(actual) => compare_values(actual, bound).map(&accept).unwrap_or(false),
        }
    }

    fn regex_match(value: Option<&Value>, pattern: &Value, flags: Option<&str>) -> StoreResult<bool> {
        let pattern = pattern.as_str().ok_or_else(|| {
            StoreError::MalformedSelector("$regex requires a string pattern".to_string())
        })?;

        let inline: String = flags
            .unwrap_or("")
            .chars()
            .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
            .collect();

        let regex = if inline.is_empty() {
            Regex::new(pattern)?
        } else {
            Regex::new(&format!("(?{}){}", inline, pattern))?
        };

        Ok(match value {
            Some(Value::String(s)) => regex.is_match(s),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .any(|s| regex.is_match(s)),
            _ => false,
        })
    }
}

/// Orders two numbers or two strings; other pairs are incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return Some(ai.cmp(&bi));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
