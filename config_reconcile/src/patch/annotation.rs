//! The suffix-encoded annotation format.
//!
//! An annotated tree is a plain configuration tree with changes marked
//! inline:
//!
//! - `key__deleted: V`: `key` exists remotely as `V` only;
//! - `key__added: V`: `key` exists locally as `V` only;
//! - `key: {"__old": A, "__new": B}`: `key` changed from `A` to `B`;
//! - in lists, tagged tuples `[" "]` or `[" ", V]` (unchanged), `["-", V]`
//!   (removed), `["+", V]` (added) and `["~", D]` (modified, where `D` is
//!   itself annotated).
//!
//! [`parse`] turns this form into a [`DiffNode`] and
//! [`DiffNode::to_annotated`] produces it from one.

use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::diff::{ArrayEntry, DiffNode};
use crate::error::ReconcileError;
use crate::tree::kind_name;
use crate::{ReconcileResult, TreePath};

/// Suffix of a key that only exists remotely.
pub const DELETED_SUFFIX: &str = "__deleted";
/// Suffix of a key that only exists locally.
pub const ADDED_SUFFIX: &str = "__added";
/// Key holding the remote value of a changed leaf.
pub const OLD_KEY: &str = "__old";
/// Key holding the local value of a changed leaf.
pub const NEW_KEY: &str = "__new";

const TAG_UNCHANGED: &str = " ";
const TAG_REMOVED: &str = "-";
const TAG_ADDED: &str = "+";
const TAG_MODIFIED: &str = "~";

/// Parses an annotated tree into a diff tree.
///
/// # Errors
///
/// Fails when the root is not a mapping, a list entry is not a tagged tuple or
/// carries an unknown tag, a change marker is malformed, or the old side of a
/// change is itself annotated. Every error names the offending path.
///
/// # Examples
///
/// ```
/// use config_reconcile::diff::DiffNode;
/// use config_reconcile::patch::annotation::parse;
/// use serde_json::json;
///
/// let node = parse(&json!({"vars": {"MY_VAR__deleted": "ABC"}}))?;
/// assert_eq!(
///     node,
///     DiffNode::Object(vec![(
///         "vars".to_owned(),
///         DiffNode::Object(vec![("MY_VAR".to_owned(), DiffNode::Removed(json!("ABC")))]),
///     )])
/// );
/// # Ok::<(), std::sync::Arc<config_reconcile::ReconcileError>>(())
/// ```
pub fn parse(annotated: &Value) -> ReconcileResult<DiffNode> {
    let root = TreePath::root();
    let Value::Object(map) = annotated else {
        return Err(ReconcileError::expected_mapping(root, annotated));
    };
    if is_change_marker(map) {
        return Err(Arc::new(ReconcileError::ExpectedMapping {
            path: root,
            found: "change marker",
        }));
    }
    parse_object(map, &root)
}

fn parse_node(value: &Value, path: &TreePath) -> ReconcileResult<DiffNode> {
    match value {
        Value::Object(map) if is_change_marker(map) => parse_change(map, path),
        Value::Object(map) => parse_object(map, path),
        Value::Array(items) => parse_array(items, path),
        scalar => Ok(DiffNode::Unchanged(scalar.clone())),
    }
}

fn parse_object(map: &Map<String, Value>, path: &TreePath) -> ReconcileResult<DiffNode> {
    let entries = map
        .iter()
        .map(|(key, value)| {
            if let Some(base) = key.strip_suffix(DELETED_SUFFIX) {
                Ok((base.to_owned(), DiffNode::Removed(value.clone())))
            } else if let Some(base) = key.strip_suffix(ADDED_SUFFIX) {
                Ok((base.to_owned(), DiffNode::Added(value.clone())))
            } else {
                parse_node(value, &path.key(key)).map(|node| (key.clone(), node))
            }
        })
        .collect::<ReconcileResult<Vec<_>>>()?;
    Ok(DiffNode::Object(entries))
}

fn is_change_marker(map: &Map<String, Value>) -> bool {
    map.contains_key(OLD_KEY) || map.contains_key(NEW_KEY)
}

fn parse_change(map: &Map<String, Value>, path: &TreePath) -> ReconcileResult<DiffNode> {
    let (Some(old), Some(new), 2) = (map.get(OLD_KEY), map.get(NEW_KEY), map.len()) else {
        return Err(Arc::new(ReconcileError::MalformedChange {
            path: path.clone(),
        }));
    };
    if looks_annotated(old) {
        return Err(Arc::new(ReconcileError::NestedChange {
            path: path.clone(),
        }));
    }
    Ok(DiffNode::Changed {
        old: old.clone(),
        new: new.clone(),
    })
}

fn looks_annotated(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        is_change_marker(map)
            || map
                .keys()
                .any(|key| key.ends_with(DELETED_SUFFIX) || key.ends_with(ADDED_SUFFIX))
    })
}

fn parse_array(items: &[Value], path: &TreePath) -> ReconcileResult<DiffNode> {
    let entries = items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_entry(item, &path.index(index)))
        .collect::<ReconcileResult<Vec<_>>>()?;
    Ok(DiffNode::Array(entries))
}

fn parse_entry(item: &Value, path: &TreePath) -> ReconcileResult<ArrayEntry> {
    let Value::Array(tuple) = item else {
        return Err(ReconcileError::malformed_entry(
            path.clone(),
            format!("expected a tagged tuple, found {}", kind_name(item)),
        ));
    };
    let Some(first) = tuple.first() else {
        return Err(ReconcileError::malformed_entry(path.clone(), "empty tagged tuple"));
    };
    let Value::String(tag) = first else {
        return Err(ReconcileError::malformed_entry(
            path.clone(),
            format!("expected a string tag, found {}", kind_name(first)),
        ));
    };

    let payload = tuple.get(1);
    match (tag.as_str(), payload) {
        (TAG_UNCHANGED, None) => Ok(ArrayEntry::Elided),
        (TAG_UNCHANGED, Some(value)) => Ok(ArrayEntry::Unchanged(value.clone())),
        (TAG_REMOVED | TAG_ADDED | TAG_MODIFIED, _) if tuple.len() != 2 => {
            Err(ReconcileError::malformed_entry(
                path.clone(),
                format!("tag {tag:?} takes exactly one value, found {}", tuple.len() - 1),
            ))
        }
        (TAG_REMOVED, Some(value)) => Ok(ArrayEntry::Removed(value.clone())),
        (TAG_ADDED, Some(value)) => Ok(ArrayEntry::Added(value.clone())),
        (TAG_MODIFIED, Some(value @ (Value::Object(_) | Value::Array(_)))) => {
            parse_node(value, path).map(ArrayEntry::Modified)
        }
        (TAG_MODIFIED, Some(value)) => Err(ReconcileError::malformed_entry(
            path.clone(),
            format!("a modified entry wraps a mapping or list, found {}", kind_name(value)),
        )),
        _ => Err(Arc::new(ReconcileError::UnknownArrayTag {
            path: path.clone(),
            tag: tag.clone(),
        })),
    }
}

impl DiffNode {
    /// Expresses this diff in the suffix-encoded annotation form.
    ///
    /// Unchanged mapping entries are left out and unchanged list elements
    /// become `[" "]` placeholders, so the result records only what differs.
    /// An unchanged mapping therefore annotates as `{}`.
    #[must_use]
    pub fn to_annotated(&self) -> Value {
        match self {
            Self::Unchanged(Value::Object(_)) => Value::Object(Map::new()),
            Self::Unchanged(Value::Array(items)) => {
                Value::Array(items.iter().map(|_| json!([TAG_UNCHANGED])).collect())
            }
            Self::Unchanged(value) | Self::Added(value) | Self::Removed(value) => value.clone(),
            Self::Changed { old, new } => json!({ OLD_KEY: old, NEW_KEY: new }),
            Self::Object(entries) => {
                let mut map = Map::new();
                for (key, node) in entries {
                    match node {
                        Self::Unchanged(_) => {}
                        Self::Added(value) => {
                            map.insert(format!("{key}{ADDED_SUFFIX}"), value.clone());
                        }
                        Self::Removed(value) => {
                            map.insert(format!("{key}{DELETED_SUFFIX}"), value.clone());
                        }
                        other => {
                            map.insert(key.clone(), other.to_annotated());
                        }
                    }
                }
                Value::Object(map)
            }
            Self::Array(items) => Value::Array(items.iter().map(annotate_entry).collect()),
        }
    }
}

fn annotate_entry(entry: &ArrayEntry) -> Value {
    match entry {
        ArrayEntry::Unchanged(_) | ArrayEntry::Elided => json!([TAG_UNCHANGED]),
        ArrayEntry::Added(value) => json!([TAG_ADDED, value]),
        ArrayEntry::Removed(value) => json!([TAG_REMOVED, value]),
        ArrayEntry::Modified(node) => json!([TAG_MODIFIED, node.to_annotated()]),
    }
}
