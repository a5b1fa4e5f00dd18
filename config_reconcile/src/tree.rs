//! Structural helpers shared by the normaliser, differ and patch builder.
//!
//! A configuration tree is a [`serde_json::Value`]. Mapping insertion order is
//! preserved and drives rendering order, but never affects equality.

use serde_json::{Map, Value};

/// A configuration tree: scalar, list or mapping.
pub type ConfigTree = Value;

/// Structural equality that ignores mapping key order and compares numbers
/// numerically, so `1` equals `1.0`.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            a == b
                || matches!(
                    (a.as_f64(), b.as_f64()),
                    (Some(x), Some(y)) if x.total_cmp(&y).is_eq()
                )
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => maps_equal(a, b),
        _ => left == right,
    }
}

fn maps_equal(left: &Map<String, Value>, right: &Map<String, Value>) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|(key, value)| right.get(key).is_some_and(|other| values_equal(value, other)))
}

/// Whether the value is an empty list or an empty mapping.
#[must_use]
pub fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Whether both values are lists or both are mappings.
#[must_use]
pub const fn same_container_kind(left: &Value, right: &Value) -> bool {
    matches!(
        (left, right),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_))
    )
}

/// Human-readable name for the kind of a value, used in error messages.
#[must_use]
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// The identity of a record: the first of `keys` present on the mapping with a
/// string or number value.
#[must_use]
pub fn identity<'a>(value: &'a Value, keys: &'a [String]) -> Option<(&'a str, &'a Value)> {
    let map = value.as_object()?;
    keys.iter().find_map(|key| {
        map.get(key)
            .filter(|candidate| candidate.is_string() || candidate.is_number())
            .map(|candidate| (key.as_str(), candidate))
    })
}

/// Whether two records share an identity under `keys`.
#[must_use]
pub fn same_identity(left: &Value, right: &Value, keys: &[String]) -> bool {
    match (identity(left, keys), identity(right, keys)) {
        (Some((left_key, left_id)), Some((right_key, right_id))) => {
            left_key == right_key && values_equal(left_id, right_id)
        }
        _ => false,
    }
}
