//! RFC 7396 JSON merge patch.
//!
//! - objects merge key by key, recursively
//! - a `null` in the patch removes the key
//! - anything else in the patch replaces the target value

use serde_json::{Map, Value};

/// Apply `patch` on top of `target`.
///
/// ```
/// use serde_json::json;
/// use snake_config::merge::merge_patch;
///
/// let global = json!({"tools": {"mypy": {"binary": "mypy", "default_args": ["--strict"]}}});
/// let local = json!({"tools": {"mypy": {"default_args": null}}});
/// assert_eq!(
///     merge_patch(global, local),
///     json!({"tools": {"mypy": {"binary": "mypy"}}})
/// );
/// ```
pub fn merge_patch(target: Value, patch: Value) -> Value {
    let Value::Object(patch) = patch else {
        return patch;
    };
    let target = match target {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Value::Object(merge_objects(target, patch))
}

fn merge_objects(mut target: Map<String, Value>, patch: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in patch {
        if value.is_null() {
            target.remove(&key);
            continue;
        }
        let merged = match target.remove(&key) {
            Some(existing) => merge_patch(existing, value),
            None => merge_patch(Value::Null, value),
        };
        target.insert(key, merged);
    }
    target
}
