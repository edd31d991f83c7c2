//! Oblique (wedge) and conical (Taylor–Maccoll) shock relations.
//!
//! Angles are in radians. Both solvers return the weak, attached solution and
//! fail with [`ComponentError::Detached`] when the deflection exceeds the
//! maximum for the given Mach number.

use crate::error::{ComponentError, ComponentResult};
use std::f64::consts::FRAC_PI_2;

const SCAN_STEPS: usize = 400;
const BISECTIONS: usize = 80;
const TM_STEP: f64 = 2.0e-4;

/// Flow deflection produced by a shock at angle `beta` (θ–β–M relation).
pub fn deflection_angle(m: f64, beta: f64, gamma: f64) -> f64 {
    let mn2 = (m * beta.sin()).powi(2);
    let num = 2.0 * (mn2 - 1.0) / beta.tan();
    let den = m * m * (gamma + (2.0 * beta).cos()) + 2.0;
    (num / den).atan()
}

pub fn mach_angle(m: f64) -> f64 {
    (1.0 / m).asin()
}

/// Scan (μ, π/2) for the angle where `f` peaks, then bisect `f(β) = target`
/// on the weak branch.
fn weak_branch<F>(m: f64, target: f64, what: &str, mut f: F) -> ComponentResult<f64>
where
    F: FnMut(f64) -> ComponentResult<f64>,
{
    let mu = mach_angle(m);
    let span = FRAC_PI_2 - mu;
    let mut best_beta = mu;
    let mut best = 0.0;
    for i in 1..SCAN_STEPS {
        let beta = mu + span * i as f64 / SCAN_STEPS as f64;
        let value = f(beta)?;
        if value > best {
            best = value;
            best_beta = beta;
        }
    }
    if target > best {
        return Err(ComponentError::Detached {
            what: format!(
                "{what} angle {:.3} deg exceeds maximum {:.3} deg at Mach {m:.3}",
                target.to_degrees(),
                best.to_degrees()
            ),
        });
    }

    let mut lo = mu;
    let mut hi = best_beta;
    for _ in 0..BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if f(mid)? < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Weak oblique shock angle for a wedge of half-angle `theta`.
pub fn wedge_shock_angle(m: f64, theta: f64, gamma: f64) -> ComponentResult<f64> {
    check_inputs(m, theta)?;
    weak_branch(m, theta, "wedge", |beta| Ok(deflection_angle(m, beta, gamma)))
}

/// Conical shock solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSolution {
    /// Shock angle
    pub beta: f64,
    /// Mach number on the cone surface
    pub surface_mach: f64,
}

/// Shock angle for a cone of half-angle `theta_c` in a uniform stream.
pub fn cone_shock_angle(m: f64, theta_c: f64, gamma: f64) -> ComponentResult<ConeSolution> {
    check_inputs(m, theta_c)?;
    let beta = weak_branch(m, theta_c, "cone", |beta| {
        Ok(taylor_maccoll(m, beta, gamma).map_or(0.0, |(theta, _)| theta))
    })?;
    let (_, v_surface) = taylor_maccoll(m, beta, gamma).ok_or_else(|| {
        ComponentError::ConvergenceFailed {
            what: "Taylor-Maccoll integration did not reach the cone surface".into(),
        }
    })?;
    let surface_mach = (2.0 / ((gamma - 1.0) * (1.0 / (v_surface * v_surface) - 1.0))).sqrt();
    Ok(ConeSolution { beta, surface_mach })
}

fn check_inputs(m: f64, theta: f64) -> ComponentResult<()> {
    if !(m.is_finite() && m > 1.0) {
        return Err(ComponentError::NonPhysical {
            what: "oblique shock needs a supersonic stream",
        });
    }
    if !(theta.is_finite() && theta > 0.0 && theta < FRAC_PI_2) {
        return Err(ComponentError::InvalidArg {
            what: "body half-angle must be between 0 and 90 degrees",
        });
    }
    Ok(())
}

/// Nondimensional speed V / V_max for Mach `m`.
fn speed_ratio(m: f64, gamma: f64) -> f64 {
    (2.0 / ((gamma - 1.0) * m * m) + 1.0).powf(-0.5)
}

/// Integrate the Taylor–Maccoll equation inward from a shock at `beta`.
///
/// Returns the cone angle where the polar velocity vanishes and the radial
/// speed ratio there, or `None` if the integration never reaches a surface.
fn taylor_maccoll(m: f64, beta: f64, gamma: f64) -> Option<(f64, f64)> {
    let delta = deflection_angle(m, beta, gamma);
    if delta <= 0.0 {
        return None;
    }
    let mn1 = m * beta.sin();
    let mn2_sq = (1.0 + 0.5 * (gamma - 1.0) * mn1 * mn1) / (gamma * mn1 * mn1 - 0.5 * (gamma - 1.0));
    let m2 = (mn2_sq.sqrt()) / (beta - delta).sin();
    let v2 = speed_ratio(m2, gamma);

    let mut theta = beta;
    let mut y = [v2 * (beta - delta).cos(), -v2 * (beta - delta).sin()];
    let h = -TM_STEP;
    while theta > TM_STEP {
        let next = rk4_step(theta, y, h, gamma)?;
        if next[1] >= 0.0 {
            let frac = y[1] / (y[1] - next[1]);
            let theta_c = theta + frac * h;
            let vr = y[0] + frac * (next[0] - y[0]);
            return Some((theta_c, vr));
        }
        y = next;
        theta += h;
    }
    None
}

fn tm_rhs(theta: f64, y: [f64; 2], gamma: f64) -> Option<[f64; 2]> {
    let [vr, vt] = y;
    let a = 0.5 * (gamma - 1.0) * (1.0 - vr * vr - vt * vt);
    let den = a - vt * vt;
    if den.abs() < 1e-12 {
        return None;
    }
    let dvt = (vr * vt * vt - a * (2.0 * vr + vt / theta.tan())) / den;
    Some([vt, dvt])
}

fn rk4_step(theta: f64, y: [f64; 2], h: f64, gamma: f64) -> Option<[f64; 2]> {
    let add = |y: [f64; 2], k: [f64; 2], s: f64| [y[0] + s * k[0], y[1] + s * k[1]];
    let k1 = tm_rhs(theta, y, gamma)?;
    let k2 = tm_rhs(theta + 0.5 * h, add(y, k1, 0.5 * h), gamma)?;
    let k3 = tm_rhs(theta + 0.5 * h, add(y, k2, 0.5 * h), gamma)?;
    let k4 = tm_rhs(theta + h, add(y, k3, h), gamma)?;
    Some([
        y[0] + h / 6.0 * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]),
        y[1] + h / 6.0 * (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]),
    ])
}
