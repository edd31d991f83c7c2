//! Shared gas dynamics helpers for components.

use crate::error::{ComponentError, ComponentResult};
use gp_core::numeric::ensure_finite;
use gp_core::units::{Velocity, mps, pa};
use gp_gas::{GasModel, GasState};
use gp_solver::{SecantConfig, ShockSpeedSolver};

/// Upper limit on a reflected shock speed, in multiples of the incident sound speed
pub const REFLECTED_SPEED_LIMIT: f64 = 10.0;

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Static-to-total pressure ratio `p / p0` at Mach `m`.
pub fn isentropic_pressure_ratio(gamma: f64, m: f64) -> f64 {
    (1.0 + 0.5 * (gamma - 1.0) * m * m).powf(-gamma / (gamma - 1.0))
}

/// Area ratio `A / A*` at Mach `m`.
pub fn area_mach_ratio(gamma: f64, m: f64) -> f64 {
    let exponent = (gamma + 1.0) / (2.0 * (gamma - 1.0));
    (2.0 / (gamma + 1.0) * (1.0 + 0.5 * (gamma - 1.0) * m * m)).powf(exponent) / m
}

/// Steady isentropic expansion of `total` (a state at rest) to Mach `m`.
pub fn steady_expand_to_mach(
    model: &dyn GasModel,
    total: &GasState,
    m: f64,
) -> ComponentResult<GasState> {
    let gamma = model.gamma_and_r(total).0;
    let p = total.pressure().value * isentropic_pressure_ratio(gamma, m);
    check_finite(p, "expanded pressure")?;
    let expanded = model.isentropic_to_pressure(total, pa(p))?;
    let u = m * model.speed_of_sound(&expanded).value;
    Ok(expanded.with_velocity(mps(u)))
}

/// Mach number requested of a reflected shock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReflectedMach {
    /// Solve for the shock that brings the gas to rest.
    Maximum,
    /// Fixed reflected shock Mach number `(u + vr) / a`.
    Value(f64),
}

/// Outcome of a shock reflected upstream into a moving gas.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedShock {
    /// Post-shock state in the lab frame.
    pub state: GasState,
    /// Reflected shock Mach number relative to the incident gas.
    pub mach: f64,
    /// Lab-frame speed of the reflected shock, travelling upstream.
    pub speed: Velocity,
}

/// Reflect a shock into `incident`, which moves towards the reflecting wall.
///
/// The reflected shock travels upstream at `vr`, so gas enters it at
/// `w1 = u + vr` and leaves at lab velocity `w2 - vr`.
pub fn reflected_shock(
    model: &dyn GasModel,
    incident: &GasState,
    mach: ReflectedMach,
) -> ComponentResult<ReflectedShock> {
    let u = incident.velocity().value;
    let a = model.speed_of_sound(incident).value;

    let (vr, at_rest) = match mach {
        ReflectedMach::Value(mr) => {
            if !(mr.is_finite() && mr > 1.0) {
                return Err(ComponentError::InvalidArg {
                    what: "reflected shock Mach number must be greater than 1",
                });
            }
            (mr * a - u, false)
        }
        ReflectedMach::Maximum => {
            if u <= 0.0 {
                return Err(ComponentError::NonPhysical {
                    what: "gas must move towards the wall to be stagnated by a reflected shock",
                });
            }
            let lo = (a - u).max(0.0) + 1.0e-3 * a;
            let hi = REFLECTED_SPEED_LIMIT * a;
            let solver = ShockSpeedSolver::new(
                (lo + 0.5 * a, lo + a),
                (lo, hi),
                SecantConfig::default(),
            );
            let result = solver.solve(|vr| {
                let jump = model.shock_jump(incident, mps(u + vr))?;
                Ok((jump.w2.value - vr) / a)
            })?;
            (result.root, true)
        }
    };

    let jump = model.shock_jump(incident, mps(u + vr))?;
    let state = if at_rest {
        jump.state.at_rest()
    } else {
        jump.state.with_velocity(mps(jump.w2.value - vr))
    };
    Ok(ReflectedShock {
        state,
        mach: (u + vr) / a,
        speed: mps(vr),
    })
}
