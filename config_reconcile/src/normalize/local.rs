//! Removing what only exists on one side by construction.

use std::collections::BTreeMap;

use serde_json::Value;

use super::Tree;
use crate::ReconcileOptions;

/// Drops `null` mapping entries at every depth. A `null` is how an unset
/// optional field serialises, which is the same as the field being absent.
pub(super) fn strip_nulls(tree: &mut Tree) {
    tree.retain(|_, value| !value.is_null());
    for value in tree.values_mut() {
        strip_nulls_in(value);
    }
}

fn strip_nulls_in(value: &mut Value) {
    match value {
        Value::Object(map) => strip_nulls(map),
        Value::Array(items) => items.iter_mut().for_each(strip_nulls_in),
        _ => {}
    }
}

pub(super) fn strip_local_only_keys(tree: &mut Tree, keys: &[String]) {
    tree.retain(|key, _| !keys.contains(key));
}

/// Removes the local development flag from every binding entry.
pub(super) fn strip_binding_flags(tree: &mut Tree, options: &ReconcileOptions) {
    let flag = options.local_binding_flag.as_str();
    for dotted in &options.binding_lists {
        if let Some(Value::Array(entries)) = value_at_path_mut(tree, dotted) {
            for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
                entry.retain(|key, _| key != flag);
            }
        }
    }
    for key in &options.binding_singletons {
        if let Some(Value::Object(binding)) = tree.get_mut(key) {
            binding.retain(|field, _| field != flag);
        }
    }
}

/// Keeps only the sub-fields the remote side is able to report.
pub(super) fn project_remote_visible(tree: &mut Tree, visible: &BTreeMap<String, Vec<String>>) {
    for (key, fields) in visible {
        if let Some(Value::Object(block)) = tree.get_mut(key) {
            block.retain(|field, _| fields.contains(field));
        }
    }
}

fn value_at_path_mut<'a>(tree: &'a mut Tree, dotted: &str) -> Option<&'a mut Value> {
    let mut segments = dotted.split('.');
    let first = segments.next()?;
    segments.try_fold(tree.get_mut(first)?, |current, segment| {
        current.as_object_mut()?.get_mut(segment)
    })
}
