//! Dot-separated field paths over JSON documents

use serde_json::{Map, Value};

/// Resolves `path` inside `document`.
///
/// Objects are traversed by key; arrays by numeric segment.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolves `path` inside a document's top-level map
pub fn lookup_map<'a>(document: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    match path.split_once('.') {
        None => document.get(path),
        Some((head, rest)) => lookup(document.get(head)?, rest),
    }
}

/// Sets `path` to `value`, creating intermediate objects.
///
/// Returns false if an intermediate segment exists and is not an object.
pub fn set_path(document: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let mut segments = path.split('.').peekable();
    let mut current = document;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value);
            return true;
        }

        let next = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        current = match next {
            Value::Object(map) => map,
            _ => return false,
        };
    }

    false
}

/// Removes `path`, returning the removed value
pub fn remove_path(document: &mut Map<String, Value>, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => document.remove(path),
        Some((head, rest)) => match document.get_mut(head)? {
            Value::Object(map) => remove_path(map, rest),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_nested() {
        let doc = json!({"author": {"name": "Ann"}, "tags": ["a", "b"]});

        assert_eq!(lookup(&doc, "author.name"), Some(&json!("Ann")));
        assert_eq!(lookup(&doc, "tags.1"), Some(&json!("b")));
        assert_eq!(lookup(&doc, "author.age"), None);
        assert_eq!(lookup(&doc, "tags.x"), None);
    }

    #[test]
    fn test_set_path_creates_objects() {
        let mut doc = Map::new();
        assert!(set_path(&mut doc, "meta.stats.views", json!(3)));
        assert_eq!(Value::Object(doc), json!({"meta": {"stats": {"views": 3}}}));
    }

    #[test]
    fn test_set_path_refuses_scalar_parent() {
        let mut doc = json!({"meta": 1}).as_object().cloned().unwrap();
        assert!(!set_path(&mut doc, "meta.views", json!(3)));
    }

    #[test]
    fn test_remove_path() {
        let mut doc = json!({"meta": {"views": 3, "likes": 1}}).as_object().cloned().unwrap();
        assert_eq!(remove_path(&mut doc, "meta.views"), Some(json!(3)));
        assert_eq!(Value::Object(doc), json!({"meta": {"likes": 1}}));
    }
}
