//! Reconciliation of a deployed configuration with a local one.
//!
//! Before a deploy overwrites the configuration of a running service, the
//! deploy command compares what is live (`remote`) with what is about to be
//! uploaded (`local`). This crate does that comparison:
//!
//! - [`normalize`] makes the two trees comparable,
//! - [`diff`] computes a structural diff and renders it as text,
//! - [`classify`] decides whether the diff only adds configuration,
//! - [`patch`] builds patches that keep remote values the deploy would lose.
//!
//! [`reconcile()`] runs the first three steps in one call.
//!
//! ```
//! use config_reconcile::reconcile;
//! use serde_json::json;
//!
//! let outcome = reconcile(
//!     &json!({"kv_namespaces": []}),
//!     &json!({"kv_namespaces": [{"binding": "MY_KV", "id": "abc"}]}),
//! );
//! assert!(outcome.is_non_destructive());
//! assert!(!outcome.is_empty());
//! ```
//!
//! Everything here is pure: inputs are borrowed and never mutated, and no I/O
//! happens outside [`ReconcileOptions::load`].

use std::sync::Arc;

pub mod classify;
pub mod diff;
mod error;
pub mod normalize;
mod options;
mod path;
pub mod patch;
mod reconcile;
mod result_ext;
pub mod tree;

pub use error::ReconcileError;
pub use options::{ENV_PREFIX, ReconcileOptions};
pub use path::{PathSegment, TreePath};
pub use reconcile::{ConfigDiff, RenderedDiff, reconcile, reconcile_with};
pub use result_ext::{ReconcileResultExt, ResultIntoFigment};
pub use tree::ConfigTree;

/// Result type used throughout the crate.
pub type ReconcileResult<T> = Result<T, Arc<ReconcileError>>;
