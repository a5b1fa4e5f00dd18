//! Applying a patch onto a configuration tree.
//!
//! Patches are applied with a deep merge: mappings merge key by key, lists
//! merge position by position, and anything else replaces the target value.
//! An empty mapping inside a patch list is a placeholder and keeps the target
//! element at that position as it is. Past the end of the target list every
//! element is appended, placeholders included.

use serde_json::{Map, Value};

/// Deep-merge `patch` into `target`.
///
/// Non-mapping targets are replaced by an empty mapping before a mapping is
/// merged in, and non-list targets by an empty list before a list is merged
/// in. Patch list elements past the end of the target list are appended.
///
/// # Examples
///
/// ```rust
/// use config_reconcile::patch::apply_patch;
/// use serde_json::json;
///
/// let mut local = json!({"vars": {"NEW": "1"}, "routes": ["a", "b"]});
/// apply_patch(&mut local, json!({"vars": {"OLD": "2"}, "routes": [{}, "c"]}));
/// assert_eq!(
///     local,
///     json!({"vars": {"NEW": "1", "OLD": "2"}, "routes": ["a", "c"]})
/// );
/// ```
pub fn apply_patch(target: &mut Value, patch: Value) {
    match patch {
        Value::Object(map) => merge_object(target, map),
        Value::Array(items) => merge_array(target, items),
        _ => *target = patch,
    }
}

fn merge_object(target: &mut Value, map: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    let Some(target_map) = target.as_object_mut() else {
        return;
    };

    for (key, value) in map {
        match target_map.get_mut(&key) {
            Some(existing) => apply_patch(existing, value),
            None => {
                target_map.insert(key, value);
            }
        }
    }
}

fn merge_array(target: &mut Value, items: Vec<Value>) {
    if !target.is_array() {
        *target = Value::Array(Vec::new());
    }

    let Some(target_items) = target.as_array_mut() else {
        return;
    };

    for (index, item) in items.into_iter().enumerate() {
        match target_items.get_mut(index) {
            Some(_) if is_placeholder(&item) => {}
            Some(existing) => apply_patch(existing, item),
            None => target_items.push(item),
        }
    }
}

fn is_placeholder(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}
