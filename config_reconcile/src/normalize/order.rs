//! Key reordering.

use serde_json::{Map, Value};

/// Reorders the keys of `source` to follow `target`.
///
/// Keys shared with `target` come first, in `target` order; keys only in
/// `source` follow in their original relative order. Nested mappings are
/// reordered against their counterpart in `target` when one exists. Lists are
/// left alone.
///
/// ```
/// use config_reconcile::normalize::order_object_fields;
/// use serde_json::json;
///
/// # fn map(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
/// #     match value {
/// #         serde_json::Value::Object(map) => map,
/// #         _ => serde_json::Map::new(),
/// #     }
/// # }
/// let source = map(json!({"d": 1, "b": 1, "a": 1, "e": 1, "f": 1}));
/// let target = map(json!({"a": 0, "b": 0, "c": 0, "d": 0}));
/// let ordered = order_object_fields(&source, &target);
/// let keys: Vec<&str> = ordered.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["a", "b", "d", "e", "f"]);
/// ```
#[must_use]
pub fn order_object_fields(
    source: &Map<String, Value>,
    target: &Map<String, Value>,
) -> Map<String, Value> {
    let shared = target
        .keys()
        .filter_map(|key| source.get(key).map(|value| (key, value)));
    let source_only = source.iter().filter(|(key, _)| !target.contains_key(*key));

    shared
        .chain(source_only)
        .map(|(key, value)| {
            let reordered = match (value, target.get(key)) {
                (Value::Object(child), Some(Value::Object(child_target))) => {
                    Value::Object(order_object_fields(child, child_target))
                }
                _ => value.clone(),
            };
            (key.clone(), reordered)
        })
        .collect()
}
