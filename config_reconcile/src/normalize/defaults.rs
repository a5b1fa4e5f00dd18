//! Defaults the remote side leaves implicit.

use serde_json::{Value, json};
use tracing::debug;

use super::Tree;
use crate::tree::is_empty_container;

const OBSERVABILITY: &str = "observability";

/// Fills `workers_dev` and `preview_urls` the way the deploy command resolves
/// them: `workers_dev` is on unless routes are declared, and `preview_urls`
/// follows `workers_dev`.
pub(super) fn fill_subdomain_defaults(tree: &mut Tree) {
    if !tree.contains_key("workers_dev") {
        let has_routes = ["routes", "route"]
            .iter()
            .any(|key| tree.get(*key).is_some_and(declares_something));
        tree.insert("workers_dev".to_owned(), Value::Bool(!has_routes));
    }
    if !tree.contains_key("preview_urls") {
        let workers_dev = tree
            .get("workers_dev")
            .cloned()
            .unwrap_or(Value::Bool(true));
        tree.insert("preview_urls".to_owned(), workers_dev);
    }
}

fn declares_something(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        other => !is_empty_container(other),
    }
}

/// The fully spelled-out observability block for a given `enabled` state.
fn observability_defaults(enabled: bool) -> Value {
    json!({
        "enabled": enabled,
        "head_sampling_rate": 1,
        "logs": {
            "enabled": enabled,
            "head_sampling_rate": 1,
            "invocation_logs": true,
            "persist": true,
        },
        "traces": {
            "enabled": false,
            "persist": true,
            "head_sampling_rate": 1,
        },
    })
}

/// An absent observability block means "disabled"; a partial one gets its
/// missing fields from the defaults. Any other shape is left as is.
pub(super) fn fill_observability(tree: &mut Tree) {
    match tree.get_mut(OBSERVABILITY) {
        None => {
            tree.insert(OBSERVABILITY.to_owned(), observability_defaults(false));
        }
        Some(Value::Object(block)) => {
            let enabled = block.get("enabled") == Some(&Value::Bool(true));
            if let Value::Object(defaults) = observability_defaults(enabled) {
                fill_undefined_fields(block, &defaults);
            }
        }
        Some(other) => {
            debug!(value = %other, "observability block has an unrecognised shape; passing through");
        }
    }
}

fn fill_undefined_fields(target: &mut Tree, defaults: &Tree) {
    for (key, default) in defaults {
        match (target.get_mut(key), default) {
            (None, _) => {
                target.insert(key.clone(), default.clone());
            }
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                fill_undefined_fields(existing, nested);
            }
            (Some(_), _) => {}
        }
    }
}

/// Treats an absent key and an empty list or mapping as the same thing by
/// copying the empty value to whichever side lacks the key.
pub(super) fn align_empty_values(remote: &mut Tree, local: &mut Tree) {
    copy_missing_empties(local, remote);
    copy_missing_empties(remote, local);
    for (key, remote_value) in remote.iter_mut() {
        if let (Value::Object(remote_child), Some(Value::Object(local_child))) =
            (remote_value, local.get_mut(key))
        {
            align_empty_values(remote_child, local_child);
        }
    }
}

fn copy_missing_empties(from: &Tree, to: &mut Tree) {
    let missing: Vec<(String, Value)> = from
        .iter()
        .filter(|(key, value)| is_empty_container(value) && !to.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    to.extend(missing);
}
