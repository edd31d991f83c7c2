//! Finite-step integration through a centred unsteady expansion fan.
//!
//! Across a left-running fan the Riemann invariant gives `du = -dp / (ρ a)`.
//! The pressure change is split into geometric isentropic sub-steps and the
//! increment is integrated with the trapezoidal rule on `1 / (ρ a)`.

use crate::error::{SolverError, SolverResult};
use gp_core::units::{Pressure, Velocity, mps, pa};
use gp_gas::{GasModel, GasState};
use tracing::debug;

pub const DEFAULT_EXPANSION_STEPS: usize = 1000;

/// Lowest pressure ratio explored when marching towards a velocity target.
const PRESSURE_FLOOR_RATIO: f64 = 1.0e-12;

/// What the expansion stops at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpansionTarget {
    Pressure(Pressure),
    Velocity(Velocity),
}

/// Unsteady expansion integrator with a fixed number of sub-steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnsteadyExpansionIntegrator {
    steps: usize,
}

impl Default for UnsteadyExpansionIntegrator {
    fn default() -> Self {
        Self {
            steps: DEFAULT_EXPANSION_STEPS,
        }
    }
}

impl UnsteadyExpansionIntegrator {
    pub fn new(steps: usize) -> SolverResult<Self> {
        if steps == 0 {
            return Err(SolverError::InvalidInput {
                what: "unsteady expansion needs at least one step",
            });
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Expand `start` (which may already be moving) to `target`.
    ///
    /// The returned state carries the accumulated lab-frame velocity.
    pub fn expand(
        &self,
        model: &dyn GasModel,
        start: &GasState,
        target: ExpansionTarget,
    ) -> SolverResult<GasState> {
        match target {
            ExpansionTarget::Pressure(p) => self.expand_to_pressure(model, start, p.value),
            ExpansionTarget::Velocity(u) => self.expand_to_velocity(model, start, u.value),
        }
    }

    fn expand_to_pressure(
        &self,
        model: &dyn GasModel,
        start: &GasState,
        p_target: f64,
    ) -> SolverResult<GasState> {
        if !(p_target.is_finite() && p_target > 0.0) {
            return Err(SolverError::InvalidInput {
                what: "expansion target pressure must be positive and finite",
            });
        }
        let p0 = start.pressure().value;
        let ratio = p_target / p0;
        let mut prev = start.clone();
        let mut u = start.velocity().value;

        for i in 1..=self.steps {
            let p_i = if i == self.steps {
                p_target
            } else {
                p0 * ratio.powf(i as f64 / self.steps as f64)
            };
            let next = model.isentropic_to_pressure(start, pa(p_i))?;
            u += velocity_increment(&prev, &next);
            prev = next;
        }

        debug!(
            p_start = p0,
            p_end = p_target,
            u_start = start.velocity().value,
            u_end = u,
            steps = self.steps,
            "unsteady expansion to pressure"
        );
        Ok(prev.with_velocity(mps(u)))
    }

    fn expand_to_velocity(
        &self,
        model: &dyn GasModel,
        start: &GasState,
        u_target: f64,
    ) -> SolverResult<GasState> {
        let u_start = start.velocity().value;
        if !u_target.is_finite() {
            return Err(SolverError::InvalidInput {
                what: "expansion target velocity must be finite",
            });
        }
        if u_target < u_start {
            return Err(SolverError::InvalidInput {
                what: "expansion cannot decelerate the flow",
            });
        }
        if u_target == u_start {
            return Ok(start.clone());
        }

        let p0 = start.pressure().value;
        let mut prev = start.clone();
        let mut u_prev = u_start;

        for i in 1..=self.steps {
            let p_i = p0 * PRESSURE_FLOOR_RATIO.powf(i as f64 / self.steps as f64);
            let next = model.isentropic_to_pressure(start, pa(p_i))?;
            let u_next = u_prev + velocity_increment(&prev, &next);
            if u_next >= u_target {
                // Interpolate the crossing in log-pressure.
                let frac = (u_target - u_prev) / (u_next - u_prev);
                let ln_p = prev.pressure().value.ln()
                    + frac * (next.pressure().value.ln() - prev.pressure().value.ln());
                let crossed = model.isentropic_to_pressure(start, pa(ln_p.exp()))?;
                debug!(
                    p_start = p0,
                    p_end = ln_p.exp(),
                    u_end = u_target,
                    step = i,
                    "unsteady expansion to velocity"
                );
                return Ok(crossed.with_velocity(mps(u_target)));
            }
            prev = next;
            u_prev = u_next;
        }

        Err(SolverError::ConvergenceFailed {
            what: format!(
                "target velocity {u_target} m/s not reached before pressure floor (reached {u_prev} m/s)"
            ),
            iterations: self.steps,
        })
    }
}

/// Trapezoidal `-dp / (ρ a)` between two states on the same isentrope.
fn velocity_increment(from: &GasState, to: &GasState) -> f64 {
    let dp = to.pressure().value - from.pressure().value;
    let inv_from = 1.0 / (from.density().value * from.sound_speed().value);
    let inv_to = 1.0 / (to.density().value * to.sound_speed().value);
    -dp * 0.5 * (inv_from + inv_to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gp_core::units::k;
    use gp_gas::{Gas, PerfectGasModel, Species};

    fn closed_form(start: &GasState, p: f64) -> f64 {
        let g = start.gamma();
        start.velocity().value
            + 2.0 * start.sound_speed().value / (g - 1.0)
                * (1.0 - (p / start.pressure().value).powf((g - 1.0) / (2.0 * g)))
    }

    #[test]
    fn zero_steps_rejected() {
        assert!(UnsteadyExpansionIntegrator::new(0).is_err());
    }

    #[test]
    fn matches_closed_form_from_rest() {
        let model = PerfectGasModel;
        let start = model
            .state_from_pt(pa(1.0e6), k(300.0), &Gas::pure(Species::He))
            .unwrap();
        let out = UnsteadyExpansionIntegrator::default()
            .expand(&model, &start, ExpansionTarget::Pressure(pa(1.0e4)))
            .unwrap();
        let exact = closed_form(&start, 1.0e4);
        assert!((out.velocity().value - exact).abs() / exact < 1e-5);
        assert!((out.pressure().value - 1.0e4).abs() < 1e-6);
    }

    #[test]
    fn velocity_target_recovers_pressure() {
        let model = PerfectGasModel;
        let start = model
            .state_from_pt(pa(5.0e5), k(300.0), &Gas::pure(Species::Air))
            .unwrap();
        let integrator = UnsteadyExpansionIntegrator::default();
        let by_pressure = integrator
            .expand(&model, &start, ExpansionTarget::Pressure(pa(1.0e3)))
            .unwrap();
        let by_velocity = integrator
            .expand(&model, &start, ExpansionTarget::Velocity(by_pressure.velocity()))
            .unwrap();
        let rel = (by_velocity.pressure().value - 1.0e3).abs() / 1.0e3;
        assert!(rel < 1e-3, "relative pressure error {rel}");
        assert_eq!(by_velocity.velocity(), by_pressure.velocity());
    }

    #[test]
    fn unreachable_velocity_fails() {
        let model = PerfectGasModel;
        let start = model
            .state_from_pt(pa(1.0e5), k(300.0), &Gas::pure(Species::Air))
            .unwrap();
        // Escape speed 2a/(γ-1) is about 1736 m/s.
        let err = UnsteadyExpansionIntegrator::new(200)
            .unwrap()
            .expand(&model, &start, ExpansionTarget::Velocity(mps(5000.0)))
            .unwrap_err();
        assert!(err.is_convergence());
    }

    #[test]
    fn deceleration_rejected() {
        let model = PerfectGasModel;
        let start = model
            .state_from_pt(pa(1.0e5), k(300.0), &Gas::pure(Species::Air))
            .unwrap()
            .with_velocity(mps(100.0));
        assert!(
            UnsteadyExpansionIntegrator::default()
                .expand(&model, &start, ExpansionTarget::Velocity(mps(50.0)))
                .is_err()
        );
    }
}
