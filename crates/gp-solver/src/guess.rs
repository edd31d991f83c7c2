//! Solver guesses and limits with typed references to earlier stages.
//!
//! A later tube's guesses are usually expressed relative to a speed found
//! upstream ("the shock-tube shock speed plus 2000 m/s"). Instead of parsing
//! strings, a guess is either a literal or a [`StageRef`] resolved through a
//! [`ReferenceLookup`] once the referenced stage has been evaluated.

use crate::error::{SolverError, SolverResult};
use crate::secant::{SecantConfig, ShockSpeedSolver};
use gp_core::{StageField, StageRole};

/// Reference to a computed quantity of another stage, plus an additive offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageRef {
    pub stage: StageRole,
    pub field: StageField,
    pub offset: f64,
}

impl StageRef {
    pub fn shock_speed(stage: StageRole, offset: f64) -> Self {
        Self {
            stage,
            field: StageField::ShockSpeed,
            offset,
        }
    }
}

/// Lookup of already-computed stage quantities.
pub trait ReferenceLookup {
    /// Value of `field` on the stage registered under `stage`, if that stage
    /// has been evaluated and exposes the field.
    fn stage_value(&self, stage: StageRole, field: StageField) -> Option<f64>;
}

/// Lookup with nothing registered.
impl ReferenceLookup for () {
    fn stage_value(&self, _stage: StageRole, _field: StageField) -> Option<f64> {
        None
    }
}

/// A solver guess or limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuessValue {
    Literal(f64),
    Reference(StageRef),
}

impl GuessValue {
    pub fn resolve(&self, lookup: &dyn ReferenceLookup) -> SolverResult<f64> {
        match self {
            GuessValue::Literal(v) => Ok(*v),
            GuessValue::Reference(r) => lookup
                .stage_value(r.stage, r.field)
                .map(|v| v + r.offset)
                .ok_or(SolverError::UnresolvedReference {
                    stage: r.stage,
                    field: r.field,
                }),
        }
    }

    pub fn reference(&self) -> Option<&StageRef> {
        match self {
            GuessValue::Literal(_) => None,
            GuessValue::Reference(r) => Some(r),
        }
    }
}

impl From<f64> for GuessValue {
    fn from(v: f64) -> Self {
        GuessValue::Literal(v)
    }
}

impl From<StageRef> for GuessValue {
    fn from(r: StageRef) -> Self {
        GuessValue::Reference(r)
    }
}

/// Unresolved solver inputs for one tube.
#[derive(Debug, Clone, PartialEq)]
pub struct ShockSpeedGuesses {
    pub guess_1: GuessValue,
    pub guess_2: GuessValue,
    pub lower_limit: GuessValue,
    pub upper_limit: GuessValue,
    pub config: SecantConfig,
}

impl ShockSpeedGuesses {
    /// All references, for static checking before evaluation.
    pub fn references(&self) -> impl Iterator<Item = &StageRef> + '_ {
        [
            &self.guess_1,
            &self.guess_2,
            &self.lower_limit,
            &self.upper_limit,
        ]
        .into_iter()
        .filter_map(GuessValue::reference)
    }

    /// Resolve every guess and limit into a ready-to-run solver.
    pub fn resolve(&self, lookup: &dyn ReferenceLookup) -> SolverResult<ShockSpeedSolver> {
        let g1 = self.guess_1.resolve(lookup)?;
        let g2 = self.guess_2.resolve(lookup)?;
        let lo = self.lower_limit.resolve(lookup)?;
        let hi = self.upper_limit.resolve(lookup)?;
        Ok(ShockSpeedSolver::new((g1, g2), (lo, hi), self.config))
    }
}
