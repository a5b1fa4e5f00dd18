//! Deciding whether a diff is safe to deploy without confirmation.
//!
//! A diff is non-destructive when it only adds: no key or list element is
//! removed and no existing value changes. [`is_non_destructive`] answers this
//! from the diff tree and is the authoritative check. [`is_non_destructive_text`]
//! answers it from rendered, possibly colourised, diff text for callers that
//! only hold the text.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::diff::DiffNode;

/// Whether `tree` contains neither removals nor changes.
///
/// # Examples
///
/// ```
/// use config_reconcile::{ReconcileOptions, classify::is_non_destructive, diff::diff};
/// use serde_json::json;
///
/// let options = ReconcileOptions::default();
/// let added = diff(&json!({}), &json!({"vars": {"A": "1"}}), &options);
/// let removed = diff(&json!({"vars": {"A": "1"}}), &json!({}), &options);
/// assert!(is_non_destructive(&added));
/// assert!(!is_non_destructive(&removed));
/// ```
#[must_use]
pub fn is_non_destructive(tree: &DiffNode) -> bool {
    let counts = tree.counts();
    counts.removed == 0 && counts.changed == 0
}

/// Whether rendered diff text contains only additions.
///
/// ANSI colour sequences are ignored. A `-` line is tolerated only when it is
/// immediately followed by a `+` line that differs from it by nothing but a
/// trailing `,`, which is how a value reads when a sibling was appended after
/// it. Empty or unreadable text counts as non-destructive.
#[must_use]
pub fn is_non_destructive_text(text: &str) -> bool {
    let plain = strip_ansi(text);
    let mut lines = plain.lines().filter(|line| !line.trim().is_empty()).peekable();
    while let Some(line) = lines.next() {
        let mut chars = line.chars();
        match chars.next() {
            Some('-') => {
                let removed = chars.as_str();
                let tolerated = lines
                    .peek()
                    .and_then(|next| next.strip_prefix('+'))
                    .is_some_and(|added| differs_by_trailing_comma(removed, added));
                if !tolerated {
                    return false;
                }
                lines.next();
            }
            Some(' ' | '+') => {}
            _ => warn!(line, "ignoring diff line without a marker column"),
        }
    }
    true
}

fn differs_by_trailing_comma(removed: &str, added: &str) -> bool {
    removed != added && removed.trim_end_matches(',') == added.trim_end_matches(',')
}

fn strip_ansi(text: &str) -> String {
    static ANSI: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").ok());
    pattern.as_ref().map_or_else(
        || text.to_owned(),
        |regex| regex.replace_all(text, "").into_owned(),
    )
}
