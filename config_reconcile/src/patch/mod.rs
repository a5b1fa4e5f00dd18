//! Building patches that restore remote values.
//!
//! A patch is a partial configuration tree holding the remote side of every
//! removal and change in a diff. Merged onto the local configuration with
//! [`apply_patch`], it puts back what the deploy would otherwise overwrite.
//! Lists in a patch follow the local positions: every local element gets a
//! slot, a `{}` placeholder unless a modified element has something to
//! restore, and removed remote elements are appended after the last one.
//!
//! Patches are built either from a live [`DiffNode`] ([`patch_from_diff`]) or
//! from a hand-written annotated tree ([`build_patch`]); see [`annotation`] for
//! that format.

pub mod annotation;
mod merge;

use serde_json::{Map, Value};
use tracing::debug;

use crate::ReconcileResult;
use crate::diff::{ArrayEntry, DiffNode};

pub use merge::apply_patch;

/// Key under which environment-specific configuration lives.
pub const ENVIRONMENTS_KEY: &str = "env";

/// Builds the patch restoring every remote value marked in `annotated`.
///
/// Renamed keys (`old__deleted` beside `new__added`) restore the old name
/// with the old value and drop the new one.
///
/// # Errors
///
/// Returns an error when `annotated` is not a valid annotated tree; see
/// [`annotation::parse`].
///
/// # Examples
///
/// ```
/// use config_reconcile::patch::build_patch;
/// use serde_json::json;
///
/// let patch = build_patch(&json!({
///     "vars": {"MY_VAR__deleted": "ABC", "VAR__added": "ABC"},
///     "compatibility_date": {"__old": "2025-07-08", "__new": "2025-07-09"},
/// }))?;
/// assert_eq!(
///     patch,
///     json!({"vars": {"MY_VAR": "ABC"}, "compatibility_date": "2025-07-08"})
/// );
/// # Ok::<(), std::sync::Arc<config_reconcile::ReconcileError>>(())
/// ```
pub fn build_patch(annotated: &Value) -> ReconcileResult<Value> {
    let tree = annotation::parse(annotated)?;
    Ok(patch_from_diff(&tree))
}

/// Like [`build_patch`], nesting the patch under `env.<environment>` when an
/// environment is named.
///
/// # Errors
///
/// Returns an error when `annotated` is not a valid annotated tree.
pub fn build_patch_for_environment(
    annotated: &Value,
    environment: Option<&str>,
) -> ReconcileResult<Value> {
    build_patch(annotated).map(|patch| scope_to_environment(patch, environment))
}

/// Nests `patch` under `env.<environment>`.
///
/// Without an environment, or for an empty patch, `patch` is returned as is.
#[must_use]
pub fn scope_to_environment(patch: Value, environment: Option<&str>) -> Value {
    match environment {
        Some(name) if patch.as_object().is_some_and(|map| !map.is_empty()) => {
            debug!(environment = name, "scoping patch to environment");
            let mut environments = Map::new();
            environments.insert(name.to_owned(), patch);
            let mut root = Map::new();
            root.insert(ENVIRONMENTS_KEY.to_owned(), Value::Object(environments));
            Value::Object(root)
        }
        _ => patch,
    }
}

/// Builds the patch restoring every removal and change in `tree`.
///
/// The result is always a mapping; it is empty when nothing needs restoring
/// or when `tree` does not describe a mapping.
#[must_use]
pub fn patch_from_diff(tree: &DiffNode) -> Value {
    match restore(tree) {
        Some(patch @ Value::Object(_)) => patch,
        _ => Value::Object(Map::new()),
    }
}

fn restore(node: &DiffNode) -> Option<Value> {
    match node {
        DiffNode::Unchanged(_) | DiffNode::Added(_) => None,
        DiffNode::Removed(value) | DiffNode::Changed { old: value, .. } => Some(value.clone()),
        DiffNode::Object(entries) => {
            let map: Map<String, Value> = entries
                .iter()
                .filter_map(|(key, child)| restore(child).map(|value| (key.clone(), value)))
                .collect();
            (!map.is_empty()).then_some(Value::Object(map))
        }
        DiffNode::Array(items) => restore_list(items),
    }
}

fn restore_list(items: &[ArrayEntry]) -> Option<Value> {
    let mut list = Vec::with_capacity(items.len());
    let mut removed = Vec::new();
    let mut restored_any = false;
    for item in items {
        match item {
            ArrayEntry::Unchanged(_) | ArrayEntry::Elided | ArrayEntry::Added(_) => {
                list.push(placeholder());
            }
            ArrayEntry::Removed(value) => removed.push(value.clone()),
            ArrayEntry::Modified(child) => {
                let restored = restore(child);
                restored_any |= restored.is_some();
                list.push(restored.unwrap_or_else(placeholder));
            }
        }
    }
    restored_any |= !removed.is_empty();
    list.extend(removed);
    restored_any.then_some(Value::Array(list))
}

fn placeholder() -> Value {
    Value::Object(Map::new())
}

#[cfg(test)]
mod tests;
