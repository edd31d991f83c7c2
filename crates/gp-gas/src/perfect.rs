//! Calorically-perfect gas backend.
//!
//! γ and R are fixed per gas: taken from the species table (ideal mixing by
//! mole fraction) or from user-supplied constants. All relations below are
//! the closed-form perfect-gas ones.

use crate::error::{GasError, GasResult};
use crate::gas::{Gas, GasKind};
use crate::model::{GasModel, ShockJump};
use crate::state::{GasState, StateParts};
use gp_core::units::constants::R_UNIVERSAL;
use gp_core::units::{Pressure, Temperature, Velocity, k, kgpm3, mps, pa};

/// Calorically-perfect gas model.
#[derive(Debug, Clone, Default)]
pub struct PerfectGasModel;

impl PerfectGasModel {
    pub const NAME: &'static str = "perfect-gas";

    pub fn new() -> Self {
        Self
    }

    /// Resolve (γ, R) for a gas.
    pub fn constants(gas: &Gas) -> (f64, f64) {
        match gas.kind() {
            GasKind::Mixture(comp) => (comp.gamma(), R_UNIVERSAL / comp.molar_mass()),
            GasKind::Custom { gamma, r } => (*gamma, *r),
        }
    }

    fn build(
        &self,
        p: f64,
        t: f64,
        u: f64,
        gamma: f64,
        r: f64,
        gas: &Gas,
    ) -> GasResult<GasState> {
        if !(t.is_finite() && t > 0.0) {
            return Err(GasError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        GasState::from_parts(StateParts {
            p: pa(p),
            t: k(t),
            rho: kgpm3(p / (r * t)),
            u: mps(u),
            a: mps((gamma * r * t).sqrt()),
            gamma,
            r,
            gas: gas.clone(),
            model: Self::NAME.to_string(),
        })
    }
}

impl GasModel for PerfectGasModel {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn state_from_pt(&self, p: Pressure, t: Temperature, gas: &Gas) -> GasResult<GasState> {
        let (gamma, r) = Self::constants(gas);
        self.build(p.value, t.value, 0.0, gamma, r, gas)
    }

    fn shock_jump(&self, upstream: &GasState, w1: Velocity) -> GasResult<ShockJump> {
        let gamma = upstream.gamma();
        let r = upstream.gas_constant();
        let m1 = w1.value / upstream.sound_speed().value;
        if !m1.is_finite() || m1 <= 1.0 {
            return Err(GasError::NonPhysical {
                what: "shock inflow must be supersonic",
            });
        }

        let m1_sq = m1 * m1;
        let p_ratio = 1.0 + 2.0 * gamma / (gamma + 1.0) * (m1_sq - 1.0);
        let rho_ratio = (gamma + 1.0) * m1_sq / ((gamma - 1.0) * m1_sq + 2.0);

        let p2 = upstream.pressure().value * p_ratio;
        let rho2 = upstream.density().value * rho_ratio;
        let t2 = p2 / (rho2 * r);
        let w2 = w1.value / rho_ratio;

        let state = self.build(p2, t2, w2, gamma, r, upstream.gas())?;
        Ok(ShockJump {
            state,
            w1,
            w2: mps(w2),
        })
    }

    fn isentropic_to_pressure(&self, start: &GasState, p: Pressure) -> GasResult<GasState> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "isentropic target pressure must be positive",
            });
        }
        let gamma = start.gamma();
        let r = start.gas_constant();
        let p_ratio = p.value / start.pressure().value;
        let t = start.temperature().value * p_ratio.powf((gamma - 1.0) / gamma);
        self.build(p.value, t, start.velocity().value, gamma, r, start.gas())
    }

    fn stagnation_state(&self, state: &GasState) -> GasResult<GasState> {
        let gamma = state.gamma();
        let r = state.gas_constant();
        let u = state.velocity().value;
        let t0 = state.temperature().value + u * u / (2.0 * state.cp());
        let p0 = state.pressure().value
            * (t0 / state.temperature().value).powf(gamma / (gamma - 1.0));
        self.build(p0, t0, 0.0, gamma, r, state.gas())
    }
}
