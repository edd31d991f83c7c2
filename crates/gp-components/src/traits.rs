//! Core trait for facility stages.

use core::fmt;

use gp_core::units::Velocity;
use gp_core::{StageField, StageKind, StageRole};
use gp_gas::NamedState;

/// A derived scalar a stage reports alongside its states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageOutput {
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl StageOutput {
    pub fn new(name: &'static str, value: f64, unit: &'static str) -> Self {
        Self { name, value, unit }
    }
}

/// Trait for a stage of an impulse facility.
///
/// A stage is built and evaluated in one step from its configuration and the
/// exit state of its predecessor; afterwards it is read-only. Components are
/// deterministic functions of their inputs.
pub trait FacilityComponent: Send + Sync + fmt::Debug {
    fn kind(&self) -> StageKind;

    /// Registry role this stage fills.
    fn role(&self) -> StageRole;

    /// Incoming state, equal by value to the predecessor's exit state.
    fn entrance_state(&self) -> &NamedState;

    /// Every state that enters the stage. Tubes add their fill state.
    fn entrance_states(&self) -> Vec<&NamedState> {
        vec![self.entrance_state()]
    }

    fn exit_state(&self) -> &NamedState;

    /// All states this stage produced, in the order they were computed.
    fn states(&self) -> Vec<&NamedState>;

    /// Resolved shock speed, for stages that drive a shock.
    fn shock_speed(&self) -> Option<Velocity> {
        None
    }

    /// Stage-specific derived quantities for reporting.
    fn outputs(&self) -> Vec<StageOutput> {
        Vec::new()
    }

    /// Value of a referenceable field, if this stage exposes it.
    fn field_value(&self, field: StageField) -> Option<f64> {
        match field {
            StageField::ShockSpeed => self.shock_speed().map(|v| v.value),
            StageField::ExitVelocity => Some(self.exit_state().state.velocity().value),
        }
    }
}
