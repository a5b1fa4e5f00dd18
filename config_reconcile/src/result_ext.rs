//! Extensions for mapping errors to `ReconcileResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(e.into()))`
//! patterns when converting external error types into the crate's
//! `ReconcileResult<T>` alias (`Result<T, Arc<ReconcileError>>`).
//!
//! # Examples
//!
//! ```
//! use config_reconcile::{ReconcileResult, ReconcileResultExt};
//! use figment::{Figment, providers::Serialized};
//!
//! fn extract_port() -> ReconcileResult<u16> {
//!     Figment::from(Serialized::default("port", 8080_u16))
//!         .extract_inner("port")
//!         .into_reconcile()
//! }
//! # assert_eq!(extract_port().ok(), Some(8080));
//! ```

use std::sync::Arc;

use crate::{ReconcileError, ReconcileResult};

/// Generic extension for mapping any `Result<T, E>` with
/// `E: Into<ReconcileError>` into a `ReconcileResult<T>`.
pub trait ReconcileResultExt<T, E> {
    /// Convert `Result<T, E>` into `ReconcileResult<T>` using
    /// `Into<ReconcileError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into
    /// `Arc<ReconcileError>`.
    fn into_reconcile(self) -> ReconcileResult<T>;
}

impl<T, E> ReconcileResultExt<T, E> for Result<T, E>
where
    E: Into<ReconcileError>,
{
    fn into_reconcile(self) -> ReconcileResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Extension to convert `Result<T, Arc<ReconcileError>>` into
/// `Result<T, figment::Error>` for code running inside `figment::Jail`.
pub trait ResultIntoFigment<T> {
    /// Map the shared error into a `figment::Error`, preserving its message.
    ///
    /// # Errors
    ///
    /// Returns a `figment::Error` containing the original message.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for ReconcileResult<T> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(|e| figment::Error::from(e.to_string()))
    }
}
