//! Structural diffing of two normalised configuration trees.
//!
//! [`diff`] compares the deployed (`remote`) tree with the tree about to be
//! deployed (`local`) and returns a [`DiffNode`]. Every leaf of either input
//! ends up in exactly one node: unchanged, added, removed or changed. Mapping
//! entries are listed in local key order with remote-only keys last, so the
//! rendered diff reads in the order the configuration file was written.
//!
//! Lists are aligned by value rather than by index; see [`ArrayEntry`].

mod array;
mod render;

use serde_json::{Map, Value};

use crate::ReconcileOptions;
use crate::tree::values_equal;

pub use render::render;

/// One node of a diff tree.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffNode {
    /// Same value on both sides.
    Unchanged(Value),
    /// Only present locally.
    Added(Value),
    /// Only present remotely.
    Removed(Value),
    /// Present on both sides with different values that cannot be compared
    /// structurally (scalars, or values of different kinds).
    Changed {
        /// The remote value.
        old: Value,
        /// The local value.
        new: Value,
    },
    /// Two mappings, compared key by key.
    Object(Vec<(String, DiffNode)>),
    /// Two lists, aligned element by element.
    Array(Vec<ArrayEntry>),
}

/// One aligned position of a list diff.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayEntry {
    /// An element present, unchanged, on both sides.
    Unchanged(Value),
    /// An unchanged element whose value was not recorded.
    Elided,
    /// An element only present locally.
    Added(Value),
    /// An element only present remotely.
    Removed(Value),
    /// A remote element aligned with a local element whose contents differ.
    Modified(DiffNode),
}

/// The positional operation carried by an [`ArrayEntry`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArrayOp {
    /// The element is kept as is.
    Unchanged,
    /// The element is inserted.
    Added,
    /// The element is dropped.
    Removed,
    /// The element is kept with different contents.
    Modified,
}

impl ArrayEntry {
    /// The positional operation of this entry.
    #[must_use]
    pub const fn op(&self) -> ArrayOp {
        match self {
            Self::Unchanged(_) | Self::Elided => ArrayOp::Unchanged,
            Self::Added(_) => ArrayOp::Added,
            Self::Removed(_) => ArrayOp::Removed,
            Self::Modified(_) => ArrayOp::Modified,
        }
    }
}

/// Number of annotations of each kind in a diff tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DiffCounts {
    /// Added keys and list elements.
    pub added: usize,
    /// Removed keys and list elements.
    pub removed: usize,
    /// Changed leaves.
    pub changed: usize,
    /// Modified list elements.
    pub modified: usize,
}

impl DiffNode {
    /// Whether anything differs anywhere below this node.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.counts() != DiffCounts::default()
    }

    /// Counts the annotations below (and including) this node.
    #[must_use]
    pub fn counts(&self) -> DiffCounts {
        let mut counts = DiffCounts::default();
        self.tally(&mut counts);
        counts
    }

    fn tally(&self, counts: &mut DiffCounts) {
        match self {
            Self::Unchanged(_) => {}
            Self::Added(_) => counts.added += 1,
            Self::Removed(_) => counts.removed += 1,
            Self::Changed { .. } => counts.changed += 1,
            Self::Object(entries) => entries.iter().for_each(|(_, node)| node.tally(counts)),
            Self::Array(items) => {
                for item in items {
                    match item {
                        ArrayEntry::Unchanged(_) | ArrayEntry::Elided => {}
                        ArrayEntry::Added(_) => counts.added += 1,
                        ArrayEntry::Removed(_) => counts.removed += 1,
                        ArrayEntry::Modified(node) => {
                            let before = *counts;
                            node.tally(counts);
                            if *counts != before {
                                counts.modified += 1;
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Diffs two normalised trees.
///
/// Never fails: values of mismatched kinds become a [`DiffNode::Changed`].
///
/// # Examples
///
/// ```
/// use config_reconcile::{ReconcileOptions, diff::{DiffNode, diff}};
/// use serde_json::json;
///
/// let tree = diff(
///     &json!({"compatibility_date": "2025-07-08"}),
///     &json!({"compatibility_date": "2025-07-09"}),
///     &ReconcileOptions::default(),
/// );
/// assert_eq!(
///     tree,
///     DiffNode::Object(vec![(
///         "compatibility_date".to_owned(),
///         DiffNode::Changed { old: json!("2025-07-08"), new: json!("2025-07-09") },
///     )])
/// );
/// ```
#[must_use]
pub fn diff(remote: &Value, local: &Value, options: &ReconcileOptions) -> DiffNode {
    Differ::new(options).diff_values(remote, local)
}

/// Diffing state shared by the recursive walk.
pub(crate) struct Differ<'a> {
    identity_keys: &'a [String],
    align_records: bool,
}

impl<'a> Differ<'a> {
    pub(crate) fn new(options: &'a ReconcileOptions) -> Self {
        Self {
            identity_keys: &options.identity_keys,
            align_records: options.align_record_lists,
        }
    }

    pub(crate) fn diff_values(&self, remote: &Value, local: &Value) -> DiffNode {
        if values_equal(remote, local) {
            return DiffNode::Unchanged(remote.clone());
        }
        match (remote, local) {
            (Value::Object(remote_map), Value::Object(local_map)) => {
                self.diff_maps(remote_map, local_map)
            }
            (Value::Array(remote_items), Value::Array(local_items)) => {
                DiffNode::Array(array::align(self, remote_items, local_items))
            }
            _ => DiffNode::Changed {
                old: remote.clone(),
                new: local.clone(),
            },
        }
    }

    fn diff_maps(&self, remote: &Map<String, Value>, local: &Map<String, Value>) -> DiffNode {
        let shared_or_added = local.iter().map(|(key, local_value)| {
            let node = remote.get(key).map_or_else(
                || DiffNode::Added(local_value.clone()),
                |remote_value| self.diff_values(remote_value, local_value),
            );
            (key.clone(), node)
        });
        let removed = remote
            .iter()
            .filter(|(key, _)| !local.contains_key(*key))
            .map(|(key, value)| (key.clone(), DiffNode::Removed(value.clone())));
        DiffNode::Object(shared_or_added.chain(removed).collect())
    }
}
