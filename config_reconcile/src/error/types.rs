//! Primary error enum for patch reconstruction and option loading.

use figment::Error as FigmentError;
use thiserror::Error;

use crate::TreePath;

/// Errors raised by the engine.
///
/// Normalisation and diffing never fail for well-typed trees. Only the patch
/// builder and option loading report errors; a patch builder error means the
/// annotated tree handed over by the caller is invalid.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReconcileError {
    /// A list entry carried a tag other than `" "`, `"-"`, `"+"` or `"~"`.
    #[error("unrecognised list entry tag {tag:?} at {path}")]
    UnknownArrayTag {
        /// Location of the offending list entry.
        path: TreePath,
        /// The tag that was found.
        tag: String,
    },

    /// A list entry was not a tagged tuple of the expected arity.
    #[error("malformed list entry at {path}: {message}")]
    MalformedArrayEntry {
        /// Location of the offending list entry.
        path: TreePath,
        /// Description of what was wrong with the entry.
        message: String,
    },

    /// A mapping used `__old`/`__new` without being exactly that pair.
    #[error("malformed change marker at {path}: expected exactly `__old` and `__new`")]
    MalformedChange {
        /// Location of the offending marker.
        path: TreePath,
    },

    /// The `__old` side of a change marker was itself an annotation.
    #[error("nested annotation inside `__old` at {path} is not supported")]
    NestedChange {
        /// Location of the offending marker.
        path: TreePath,
    },

    /// A mapping was required but another kind of value was found.
    #[error("expected a mapping at {path}, found {found}")]
    ExpectedMapping {
        /// Location of the offending value.
        path: TreePath,
        /// Kind of value that was found instead.
        found: &'static str,
    },

    /// Error reading or parsing an options file.
    #[error("Options file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying error reported while reading or parsing.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while extracting options from their providers.
    #[error("Failed to gather reconcile options: {0}")]
    Options(#[from] Box<FigmentError>),
}
