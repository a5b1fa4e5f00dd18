//! Constructors for `ReconcileError`.

use std::sync::Arc;

use figment::Error as FigmentError;
use serde_json::Value;

use super::ReconcileError;
use crate::TreePath;

impl ReconcileError {
    /// Construct an options error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use config_reconcile::ReconcileError;
    /// let e = ReconcileError::options(figment::Error::from("boom"));
    /// assert!(matches!(e, ReconcileError::Options(_)));
    /// ```
    #[must_use]
    pub fn options(source: FigmentError) -> Self {
        Self::Options(Box::new(source))
    }

    /// Construct a [`ReconcileError::File`] for an options path.
    #[must_use]
    pub fn file(
        path: &std::path::Path,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a [`ReconcileError::ExpectedMapping`] describing `found`.
    #[must_use]
    pub fn expected_mapping(path: TreePath, found: &Value) -> Arc<Self> {
        Arc::new(Self::ExpectedMapping {
            path,
            found: crate::tree::kind_name(found),
        })
    }

    /// Construct a [`ReconcileError::MalformedArrayEntry`].
    #[must_use]
    pub fn malformed_entry(path: TreePath, message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::MalformedArrayEntry {
            path,
            message: message.into(),
        })
    }

    /// The tree location the error refers to, when it has one.
    #[must_use]
    pub const fn tree_path(&self) -> Option<&TreePath> {
        match self {
            Self::UnknownArrayTag { path, .. }
            | Self::MalformedArrayEntry { path, .. }
            | Self::MalformedChange { path }
            | Self::NestedChange { path }
            | Self::ExpectedMapping { path, .. } => Some(path),
            Self::File { .. } | Self::Options(_) => None,
        }
    }
}
