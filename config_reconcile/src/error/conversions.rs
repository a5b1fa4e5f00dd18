//! Trait-based conversions between external error types and `ReconcileError`.

use figment::Error as FigmentError;

use super::ReconcileError;

impl From<FigmentError> for ReconcileError {
    fn from(e: FigmentError) -> Self {
        Self::options(e)
    }
}

impl From<ReconcileError> for FigmentError {
    /// Allow using `?` inside `figment::Jail` closures.
    fn from(e: ReconcileError) -> Self {
        match e {
            ReconcileError::Options(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
