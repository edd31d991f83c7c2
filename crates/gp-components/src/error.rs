//! Error types for component operations.

use gp_gas::GasError;
use gp_solver::SolverError;
use thiserror::Error;

/// Errors that can occur while evaluating a facility component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Shock detached: {what}")]
    Detached { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Missing parameter: {name}")]
    MissingParameter { name: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Gas model error: {0}")]
    Gas(#[from] GasError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;
