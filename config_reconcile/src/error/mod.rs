//! Error types produced by the reconciliation engine.

mod constructors;
mod conversions;
mod types;

pub use types::ReconcileError;
