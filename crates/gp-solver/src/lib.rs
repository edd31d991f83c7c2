//! Iterative solvers for the gas path engine.
//!
//! - [`ShockSpeedSolver`]: bracketed secant iteration for an unknown shock
//!   speed, driven by a residual that calls into the gas model.
//! - [`GuessValue`]: guesses and limits that are either literals or typed
//!   references to an earlier stage's computed result.
//! - [`UnsteadyExpansionIntegrator`]: finite-step centred expansion fan.

pub mod error;
pub mod expansion;
pub mod guess;
pub mod secant;

pub use error::{SolverError, SolverResult};
pub use expansion::{DEFAULT_EXPANSION_STEPS, ExpansionTarget, UnsteadyExpansionIntegrator};
pub use guess::{GuessValue, ReferenceLookup, ShockSpeedGuesses, StageRef};
pub use secant::{SecantConfig, SecantResult, ShockSpeedSolver};
