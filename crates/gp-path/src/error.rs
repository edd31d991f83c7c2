//! Error types for gas path assembly and evaluation.

use core::fmt;

use gp_components::ComponentError;
use gp_core::StageRole;
use gp_gas::GasError;
use gp_solver::SolverError;
use thiserror::Error;

/// The four failure categories of a facility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Convergence,
    PhysicalState,
    Topology,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Convergence => "convergence",
            ErrorKind::PhysicalState => "physical state",
            ErrorKind::Topology => "topology",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage a failure is attributed to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageContext(pub Option<StageRole>);

impl fmt::Display for StageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(role) => write!(f, " in {role}"),
            None => Ok(()),
        }
    }
}

/// Errors from assembling or evaluating a gas path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PathError {
    #[error("Configuration error{stage}: {message}")]
    Configuration { stage: StageContext, message: String },

    #[error("Convergence error{stage}: {message}")]
    Convergence { stage: StageContext, message: String },

    #[error("Physical state error{stage}: {message}")]
    PhysicalState { stage: StageContext, message: String },

    #[error("Topology error{stage}: {message}")]
    Topology { stage: StageContext, message: String },
}

pub type PathResult<T> = Result<T, PathError>;

impl PathError {
    pub fn configuration(stage: Option<StageRole>, message: impl Into<String>) -> Self {
        PathError::Configuration {
            stage: StageContext(stage),
            message: message.into(),
        }
    }

    pub fn physical_state(stage: Option<StageRole>, message: impl Into<String>) -> Self {
        PathError::PhysicalState {
            stage: StageContext(stage),
            message: message.into(),
        }
    }

    pub fn topology(stage: Option<StageRole>, message: impl Into<String>) -> Self {
        PathError::Topology {
            stage: StageContext(stage),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PathError::Configuration { .. } => ErrorKind::Configuration,
            PathError::Convergence { .. } => ErrorKind::Convergence,
            PathError::PhysicalState { .. } => ErrorKind::PhysicalState,
            PathError::Topology { .. } => ErrorKind::Topology,
        }
    }

    /// Stage the failure is attributed to.
    pub fn stage(&self) -> Option<StageRole> {
        match self {
            PathError::Configuration { stage, .. }
            | PathError::Convergence { stage, .. }
            | PathError::PhysicalState { stage, .. }
            | PathError::Topology { stage, .. } => stage.0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            PathError::Configuration { message, .. }
            | PathError::Convergence { message, .. }
            | PathError::PhysicalState { message, .. }
            | PathError::Topology { message, .. } => message,
        }
    }

    fn of_kind(kind: ErrorKind, stage: Option<StageRole>, message: String) -> Self {
        let stage = StageContext(stage);
        match kind {
            ErrorKind::Configuration => PathError::Configuration { stage, message },
            ErrorKind::Convergence => PathError::Convergence { stage, message },
            ErrorKind::PhysicalState => PathError::PhysicalState { stage, message },
            ErrorKind::Topology => PathError::Topology { stage, message },
        }
    }

    /// Classify a component failure and attribute it to `stage`.
    pub fn from_component(stage: StageRole, err: ComponentError) -> Self {
        let kind = component_kind(&err);
        Self::of_kind(kind, Some(stage), err.to_string())
    }
}

fn gas_kind(err: &GasError) -> ErrorKind {
    match err {
        GasError::NonPhysical { .. } => ErrorKind::PhysicalState,
        GasError::InvalidArg { .. } | GasError::UnknownGas { .. } => ErrorKind::Configuration,
    }
}

fn solver_kind(err: &SolverError) -> ErrorKind {
    match err {
        SolverError::ConvergenceFailed { .. } | SolverError::ResidualFailed { .. } => {
            ErrorKind::Convergence
        }
        SolverError::UnresolvedReference { .. } | SolverError::InvalidInput { .. } => {
            ErrorKind::Configuration
        }
        SolverError::Gas(g) => gas_kind(g),
    }
}

fn component_kind(err: &ComponentError) -> ErrorKind {
    match err {
        ComponentError::NonPhysical { .. } | ComponentError::Detached { .. } => {
            ErrorKind::PhysicalState
        }
        ComponentError::InvalidArg { .. } | ComponentError::MissingParameter { .. } => {
            ErrorKind::Configuration
        }
        ComponentError::ConvergenceFailed { .. } => ErrorKind::Convergence,
        ComponentError::Gas(g) => gas_kind(g),
        ComponentError::Solver(s) => solver_kind(s),
    }
}
