//! Gas model capability trait.

use crate::error::GasResult;
use crate::gas::Gas;
use crate::state::GasState;
use gp_core::units::{Pressure, Temperature, Velocity};

/// Result of a normal-shock jump evaluated in the shock frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ShockJump {
    /// Post-shock state. Its velocity is the shock-frame outflow speed `w2`;
    /// callers re-frame it with [`GasState::with_velocity`].
    pub state: GasState,
    /// Inflow speed relative to the shock
    pub w1: Velocity,
    /// Outflow speed relative to the shock
    pub w2: Velocity,
}

impl ShockJump {
    /// Velocity change across the shock, `w1 - w2` (always positive).
    pub fn velocity_jump(&self) -> Velocity {
        self.w1 - self.w2
    }
}

/// Trait for gas-state evaluators.
///
/// The gas path engine treats implementations as opaque physics: given two
/// independent variables they return a complete state, and they evaluate the
/// shock and isentropic relations over that state. Implementations must be
/// thread-safe (Send + Sync) so independent facility runs can share a model.
pub trait GasModel: Send + Sync {
    /// Get the model name (for debugging/logging).
    fn name(&self) -> &str;

    /// Create a quiescent state from pressure and temperature.
    fn state_from_pt(&self, p: Pressure, t: Temperature, gas: &Gas) -> GasResult<GasState>;

    /// Normal-shock relations: gas enters the shock at speed `w1` (shock frame).
    ///
    /// Fails with `NonPhysical` when `w1` is not supersonic relative to the
    /// upstream speed of sound.
    fn shock_jump(&self, upstream: &GasState, w1: Velocity) -> GasResult<ShockJump>;

    /// Isentropic change of `start` to pressure `p`. Velocity is carried over.
    fn isentropic_to_pressure(&self, start: &GasState, p: Pressure) -> GasResult<GasState>;

    /// Bring a moving state isentropically to rest (total conditions).
    fn stagnation_state(&self, state: &GasState) -> GasResult<GasState>;

    /// Speed of sound at the given state.
    fn speed_of_sound(&self, state: &GasState) -> Velocity {
        state.sound_speed()
    }

    /// Ratio of specific heats and specific gas constant [J/(kg·K)].
    fn gamma_and_r(&self, state: &GasState) -> (f64, f64) {
        (state.gamma(), state.gas_constant())
    }
}
