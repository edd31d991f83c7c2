//! Error types for solver operations.

use gp_core::{StageField, StageRole};
use gp_gas::GasError;
use thiserror::Error;

/// Errors that can occur while solving.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Convergence failed after {iterations} iterations: {what}")]
    ConvergenceFailed { what: String, iterations: usize },

    #[error("Residual evaluation failed at {at}: {what}")]
    ResidualFailed { at: f64, what: String },

    #[error("Unresolved reference to {field} of {stage}")]
    UnresolvedReference { stage: StageRole, field: StageField },

    #[error("Invalid solver input: {what}")]
    InvalidInput { what: &'static str },

    #[error("Gas model error: {0}")]
    Gas(#[from] GasError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// True for failures of the iteration itself (cap reached, bad bracket,
    /// non-physical residual evaluation).
    pub fn is_convergence(&self) -> bool {
        matches!(
            self,
            SolverError::ConvergenceFailed { .. } | SolverError::ResidualFailed { .. }
        )
    }
}
