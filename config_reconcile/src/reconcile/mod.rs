//! The reconciliation entry point.
//!
//! [`reconcile`] normalises the deployed and the local configuration, diffs
//! them, and classifies the result. Callers print [`ConfigDiff::diff`] and ask
//! for confirmation when [`ConfigDiff::is_non_destructive`] is `false`.

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::ReconcileOptions;
use crate::classify::is_non_destructive;
use crate::diff::{DiffNode, diff, render};
use crate::normalize::normalize;
use crate::patch::{patch_from_diff, scope_to_environment};

/// A diff in structured and display form.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedDiff {
    tree: DiffNode,
    text: String,
}

impl RenderedDiff {
    /// The structured diff.
    #[must_use]
    pub const fn tree(&self) -> &DiffNode {
        &self.tree
    }

    /// The line-oriented rendering, one `\n`-terminated line per entry.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for RenderedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Outcome of comparing a deployed configuration with a local one.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDiff {
    diff: Option<RenderedDiff>,
    non_destructive: bool,
}

impl ConfigDiff {
    /// The differences, or `None` when the configurations match.
    #[must_use]
    pub const fn diff(&self) -> Option<&RenderedDiff> {
        self.diff.as_ref()
    }

    /// Whether deploying would only add configuration.
    #[must_use]
    pub const fn is_non_destructive(&self) -> bool {
        self.non_destructive
    }

    /// Whether the configurations match.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.diff.is_none()
    }

    /// The patch that, merged onto the local configuration, keeps every
    /// remote value this deploy would remove or overwrite.
    #[must_use]
    pub fn patch(&self) -> Value {
        self.patch_for_environment(None)
    }

    /// Like [`ConfigDiff::patch`], nested under `env.<environment>` when an
    /// environment is named.
    #[must_use]
    pub fn patch_for_environment(&self, environment: Option<&str>) -> Value {
        let patch = self.diff.as_ref().map_or_else(
            || Value::Object(Map::new()),
            |rendered| patch_from_diff(&rendered.tree),
        );
        scope_to_environment(patch, environment)
    }
}

/// Compares `remote` with `local` using the default options.
///
/// # Examples
///
/// ```
/// use config_reconcile::reconcile;
/// use serde_json::json;
///
/// let outcome = reconcile(
///     &json!({"compatibility_date": "2025-07-08"}),
///     &json!({"compatibility_date": "2025-07-09"}),
/// );
/// assert!(!outcome.is_non_destructive());
/// assert_eq!(
///     outcome.diff().map(ToString::to_string).as_deref(),
///     Some(" {\n-  compatibility_date: \"2025-07-08\"\n+  compatibility_date: \"2025-07-09\"\n }\n")
/// );
/// ```
#[must_use]
pub fn reconcile(remote: &Value, local: &Value) -> ConfigDiff {
    reconcile_with(remote, local, &ReconcileOptions::default())
}

/// Compares `remote` with `local` using `options`.
#[must_use]
pub fn reconcile_with(remote: &Value, local: &Value, options: &ReconcileOptions) -> ConfigDiff {
    let pair = normalize(remote, local, options);
    let tree = diff(&pair.remote, &pair.local, options);
    if !tree.has_changes() {
        debug!("remote and local configuration match");
        return ConfigDiff {
            diff: None,
            non_destructive: true,
        };
    }

    let non_destructive = is_non_destructive(&tree);
    let counts = tree.counts();
    debug!(
        added = counts.added,
        removed = counts.removed,
        changed = counts.changed,
        modified = counts.modified,
        non_destructive,
        "remote and local configuration differ"
    );
    let text = render(&tree);
    ConfigDiff {
        diff: Some(RenderedDiff { tree, text }),
        non_destructive,
    }
}
