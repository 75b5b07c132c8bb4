//! Applies a field projection to a stored document

use serde_json::{Map, Value};

use crate::projection::{FieldMode, Projection};
use crate::selector::ID_FIELD;

use super::path::{lookup, remove_path, set_path};

/// Returns the projected copy of `document`.
///
/// Inclusion mode keeps the listed fields plus `_id` (unless `_id` is
/// explicitly excluded), then drops any excluded path nested inside them.
/// Exclusion mode drops the listed fields. An empty projection returns
/// the whole document.
pub fn project(document: &Value, fields: &Projection) -> Value {
    if fields.is_inclusion() {
        let mut out = Map::new();

        if fields.get(ID_FIELD) != Some(FieldMode::Exclude) {
            if let Some(id) = document.get(ID_FIELD) {
                out.insert(ID_FIELD.to_string(), id.clone());
            }
        }

        for path in fields.fields_with(FieldMode::Include) {
            if let Some(value) = lookup(document, path) {
                set_path(&mut out, path, value.clone());
            }
        }

        for path in fields.fields_with(FieldMode::Exclude) {
            if path != ID_FIELD {
                remove_path(&mut out, path);
            }
        }

        return Value::Object(out);
    }

    let mut out = match document {
        Value::Object(map) => map.clone(),
        other => return other.clone(),
    };
    for path in fields.fields_with(FieldMode::Exclude) {
        remove_path(&mut out, path);
    }
    Value::Object(out)
}
