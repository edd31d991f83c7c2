//! Steady supersonic nozzle between the last tube and the test section.

use crate::common::{area_mach_ratio, isentropic_pressure_ratio};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{FacilityComponent, StageOutput};
use gp_core::units::{mps, pa};
use gp_core::{StageKind, StageRole};
use gp_gas::{GasModel, NamedState};
use tracing::debug;

pub const DEFAULT_NOZZLE_TOLERANCE: f64 = 1.0e-4;

const MAX_BISECTIONS: usize = 200;
const MAX_EXIT_MACH: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NozzleConfig {
    /// Geometric exit-to-reference area ratio.
    pub area_ratio: f64,
    /// Relative tolerance on the area ratio during the Mach solve.
    pub tolerance: f64,
}

impl NozzleConfig {
    pub fn new(area_ratio: f64) -> Self {
        Self {
            area_ratio,
            tolerance: DEFAULT_NOZZLE_TOLERANCE,
        }
    }

    pub fn validate(&self) -> ComponentResult<()> {
        if !(self.area_ratio.is_finite() && self.area_ratio >= 1.0) {
            return Err(ComponentError::InvalidArg {
                what: "nozzle area ratio must be at least 1",
            });
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "nozzle expansion tolerance must be positive",
            });
        }
        Ok(())
    }
}

/// Supersonic root of `A / A* = target` by bisection.
pub fn supersonic_mach_from_area_ratio(
    gamma: f64,
    target: f64,
    tolerance: f64,
) -> ComponentResult<f64> {
    if !(target.is_finite() && target >= 1.0) {
        return Err(ComponentError::InvalidArg {
            what: "area ratio must be at least 1",
        });
    }
    let mut lo = 1.0;
    let mut hi = 2.0;
    while area_mach_ratio(gamma, hi) < target {
        hi *= 2.0;
        if hi > MAX_EXIT_MACH {
            return Err(ComponentError::ConvergenceFailed {
                what: format!("area ratio {target} needs an exit Mach number above {MAX_EXIT_MACH}"),
            });
        }
    }
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        let ratio = area_mach_ratio(gamma, mid);
        if ((ratio - target) / target).abs() < tolerance {
            return Ok(mid);
        }
        if ratio < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Err(ComponentError::ConvergenceFailed {
        what: format!("nozzle Mach solve for area ratio {target} did not converge"),
    })
}

/// Evaluated nozzle.
#[derive(Debug, Clone)]
pub struct Nozzle {
    config: NozzleConfig,
    entrance: NamedState,
    exit: NamedState,
    exit_mach: f64,
}

impl Nozzle {
    pub const EXIT_STATE: &'static str = "state8";

    pub fn evaluate(
        config: NozzleConfig,
        entrance: NamedState,
        model: &dyn GasModel,
    ) -> ComponentResult<Self> {
        config.validate()?;
        let gamma = model.gamma_and_r(&entrance.state).0;
        let m_in = entrance.state.mach_number();

        // Supersonic entrance: the entrance is the reference area.
        // Otherwise the flow chokes at a throat, which is the reference.
        let target = if m_in > 1.0 {
            config.area_ratio * area_mach_ratio(gamma, m_in)
        } else {
            config.area_ratio
        };
        let exit_mach = if target == 1.0 {
            1.0
        } else {
            supersonic_mach_from_area_ratio(gamma, target, config.tolerance)?
        };

        let total = model.stagnation_state(&entrance.state)?;
        let p_exit = total.pressure().value * isentropic_pressure_ratio(gamma, exit_mach);
        let exit = model.isentropic_to_pressure(&total, pa(p_exit))?;
        let u_exit = exit_mach * model.speed_of_sound(&exit).value;
        debug!(m_in, exit_mach, p_exit, "nozzle expansion");

        Ok(Self {
            config,
            entrance,
            exit: NamedState::new(Self::EXIT_STATE, exit.with_velocity(mps(u_exit))),
            exit_mach,
        })
    }

    pub fn area_ratio(&self) -> f64 {
        self.config.area_ratio
    }

    pub fn exit_mach(&self) -> f64 {
        self.exit_mach
    }
}

impl FacilityComponent for Nozzle {
    fn kind(&self) -> StageKind {
        StageKind::Nozzle
    }

    fn role(&self) -> StageRole {
        StageRole::Nozzle
    }

    fn entrance_state(&self) -> &NamedState {
        &self.entrance
    }

    fn exit_state(&self) -> &NamedState {
        &self.exit
    }

    fn states(&self) -> Vec<&NamedState> {
        vec![&self.entrance, &self.exit]
    }

    fn outputs(&self) -> Vec<StageOutput> {
        vec![
            StageOutput::new("area_ratio", self.config.area_ratio, "-"),
            StageOutput::new("exit_mach", self.exit_mach, "-"),
        ]
    }
}
