//! Gas-state evaluation errors.

use thiserror::Error;

/// Result type for gas-model operations.
pub type GasResult<T> = Result<T, GasError>;

/// Errors that can occur while evaluating gas states.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GasError {
    /// Non-physical values (negative density, pressure, subsonic shock, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Unknown gas or species name.
    #[error("Unknown gas: {name}")]
    UnknownGas { name: String },
}
