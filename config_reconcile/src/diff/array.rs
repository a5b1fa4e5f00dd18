//! List alignment.
//!
//! Lists are aligned in three steps:
//!
//! 1. record lists (every element a mapping) have remote elements that also
//!    appear verbatim locally re-seated into local order, within the slots they
//!    already occupy, so that reordering bindings is not a change;
//! 2. equal elements are anchored along a longest common subsequence;
//! 3. the gaps between anchors are walked forwards, pairing elements by
//!    identity key and then by position.

use std::borrow::Cow;
use std::iter;

use serde_json::Value;
use tracing::trace;

use super::{ArrayEntry, DiffNode, Differ};
use crate::tree::{same_container_kind, same_identity, values_equal};

pub(super) fn align(differ: &Differ<'_>, remote: &[Value], local: &[Value]) -> Vec<ArrayEntry> {
    let seated: Cow<'_, [Value]> =
        if differ.align_records && is_record_list(remote) && is_record_list(local) {
            Cow::Owned(reseat(remote, local))
        } else {
            Cow::Borrowed(remote)
        };
    let anchored = anchors(&seated, local);
    trace!(
        remote = remote.len(),
        local = local.len(),
        anchors = anchored.len(),
        "aligning list"
    );

    let mut entries = Vec::with_capacity(seated.len().max(local.len()));
    let (mut remote_from, mut local_from) = (0, 0);
    let sentinel = iter::once((seated.len(), local.len()));
    for (remote_at, local_at) in anchored.into_iter().chain(sentinel) {
        let gap_remote = seated.get(remote_from..remote_at).unwrap_or_default();
        let gap_local = local.get(local_from..local_at).unwrap_or_default();
        emit_gap(differ, gap_remote, gap_local, &mut entries);
        if let Some(value) = seated.get(remote_at) {
            entries.push(ArrayEntry::Unchanged(value.clone()));
        }
        remote_from = remote_at + 1;
        local_from = local_at + 1;
    }
    entries
}

fn is_record_list(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

/// Moves remote records that have an equal local record into local order.
///
/// Only the slots already holding such records are permuted; every other
/// remote record keeps its position.
fn reseat(remote: &[Value], local: &[Value]) -> Vec<Value> {
    let mut claimed = vec![false; local.len()];
    let mut matches: Vec<(usize, usize)> = Vec::new();
    for (remote_index, remote_value) in remote.iter().enumerate() {
        let found = local
            .iter()
            .zip(&claimed)
            .position(|(local_value, taken)| !taken && values_equal(remote_value, local_value));
        if let Some(local_index) = found {
            if let Some(taken) = claimed.get_mut(local_index) {
                *taken = true;
            }
            matches.push((remote_index, local_index));
        }
    }

    let slots: Vec<usize> = matches.iter().map(|&(remote_index, _)| remote_index).collect();
    matches.sort_by_key(|&(_, local_index)| local_index);
    let mut seated = remote.to_vec();
    for (slot, (source, _)) in slots.into_iter().zip(matches) {
        if let (Some(target), Some(value)) = (seated.get_mut(slot), remote.get(source)) {
            target.clone_from(value);
        }
    }
    seated
}

/// Index pairs of equal elements along a longest common subsequence.
///
/// When several subsequences are equally long, remote elements are skipped
/// first.
fn anchors(remote: &[Value], local: &[Value]) -> Vec<(usize, usize)> {
    let width = local.len() + 1;
    let mut table = vec![0_usize; (remote.len() + 1) * width];
    let cell = |cells: &[usize], row: usize, column: usize| {
        cells.get(row * width + column).copied().unwrap_or(0)
    };

    for (row, remote_value) in remote.iter().enumerate().rev() {
        for (column, local_value) in local.iter().enumerate().rev() {
            let length = if values_equal(remote_value, local_value) {
                cell(&table, row + 1, column + 1) + 1
            } else {
                cell(&table, row + 1, column).max(cell(&table, row, column + 1))
            };
            if let Some(slot) = table.get_mut(row * width + column) {
                *slot = length;
            }
        }
    }

    let mut pairs = Vec::new();
    let (mut row, mut column) = (0, 0);
    while let (Some(remote_value), Some(local_value)) = (remote.get(row), local.get(column)) {
        if values_equal(remote_value, local_value) {
            pairs.push((row, column));
            row += 1;
            column += 1;
        } else if cell(&table, row + 1, column) >= cell(&table, row, column + 1) {
            row += 1;
        } else {
            column += 1;
        }
    }
    pairs
}

/// Emits the entries for the elements between two anchors.
fn emit_gap(differ: &Differ<'_>, remote: &[Value], local: &[Value], out: &mut Vec<ArrayEntry>) {
    let partners = pair_gap(differ, remote, local);
    let mut paired = vec![false; remote.len()];
    for &remote_index in partners.iter().flatten() {
        if let Some(flag) = paired.get_mut(remote_index) {
            *flag = true;
        }
    }

    let mut cursor = 0;
    for (position, (local_value, partner)) in local.iter().zip(&partners).enumerate() {
        if let Some(remote_index) = *partner {
            flush_removed(remote, &paired, &mut cursor, remote_index, out);
            if let Some(remote_value) = remote.get(remote_index) {
                out.push(match differ.diff_values(remote_value, local_value) {
                    DiffNode::Unchanged(value) => ArrayEntry::Unchanged(value),
                    node => ArrayEntry::Modified(node),
                });
            }
        } else {
            let next_paired = partners
                .iter()
                .skip(position)
                .flatten()
                .next()
                .copied()
                .unwrap_or(remote.len());
            flush_removed(remote, &paired, &mut cursor, next_paired, out);
            out.push(ArrayEntry::Added(local_value.clone()));
        }
    }
    flush_removed(remote, &paired, &mut cursor, remote.len(), out);
}

fn flush_removed(
    remote: &[Value],
    paired: &[bool],
    cursor: &mut usize,
    until: usize,
    out: &mut Vec<ArrayEntry>,
) {
    while *cursor < until {
        if let (Some(value), Some(false)) = (remote.get(*cursor), paired.get(*cursor)) {
            out.push(ArrayEntry::Removed(value.clone()));
        }
        *cursor += 1;
    }
}

/// For each local element of a gap, the index of the remote element it is
/// paired with.
fn pair_gap(differ: &Differ<'_>, remote: &[Value], local: &[Value]) -> Vec<Option<usize>> {
    let mut taken = vec![false; remote.len()];
    let mut partners: Vec<Option<usize>> = vec![None; local.len()];

    for (local_index, (slot, local_value)) in partners.iter_mut().zip(local).enumerate() {
        let found = remote.iter().zip(&taken).position(|(remote_value, used)| {
            !used && same_identity(remote_value, local_value, differ.identity_keys)
        });
        if let Some(remote_index) = found {
            trace!(remote_index, local_index, "paired list elements by identity");
            if let Some(used) = taken.get_mut(remote_index) {
                *used = true;
            }
            *slot = Some(remote_index);
        }
    }

    let free_remote: Vec<usize> = taken
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(remote_index, _)| remote_index)
        .collect();
    let unpaired_local = partners
        .iter_mut()
        .zip(local)
        .filter(|(slot, _)| slot.is_none());
    for ((slot, local_value), remote_index) in unpaired_local.zip(free_remote) {
        if remote
            .get(remote_index)
            .is_some_and(|remote_value| same_container_kind(remote_value, local_value))
        {
            *slot = Some(remote_index);
        }
    }
    partners
}
