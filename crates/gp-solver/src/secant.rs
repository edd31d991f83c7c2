//! Bracketed secant iteration for shock speeds.

use crate::error::{SolverError, SolverResult};
use tracing::{debug, warn};

/// Secant solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantConfig {
    /// Convergence tolerance on |f| and on the relative step
    pub tolerance: f64,
    /// Maximum iterations
    pub max_iterations: usize,
}

impl Default for SecantConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Secant iteration result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecantResult {
    /// Converged root
    pub root: f64,
    /// Residual at the root
    pub residual: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Secant solver for `f(vs) = 0` restricted to `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShockSpeedSolver {
    guesses: (f64, f64),
    limits: (f64, f64),
    config: SecantConfig,
}

impl ShockSpeedSolver {
    pub fn new(guesses: (f64, f64), limits: (f64, f64), config: SecantConfig) -> Self {
        Self {
            guesses,
            limits,
            config,
        }
    }

    pub fn guesses(&self) -> (f64, f64) {
        self.guesses
    }

    pub fn limits(&self) -> (f64, f64) {
        self.limits
    }

    pub fn config(&self) -> SecantConfig {
        self.config
    }

    /// Raise the lower limit to at least `floor`.
    pub fn with_lower_floor(mut self, floor: f64) -> Self {
        if floor > self.limits.0 {
            self.limits.0 = floor;
        }
        self
    }

    /// Run the iteration.
    ///
    /// Any error returned by `residual` aborts the solve as
    /// [`SolverError::ResidualFailed`]; there are no retries.
    pub fn solve<F>(&self, mut residual: F) -> SolverResult<SecantResult>
    where
        F: FnMut(f64) -> SolverResult<f64>,
    {
        let (lo, hi) = self.limits;
        let tol = self.config.tolerance;

        if !(tol.is_finite() && tol > 0.0) {
            return Err(SolverError::InvalidInput {
                what: "solver tolerance must be positive and finite",
            });
        }
        if self.config.max_iterations == 0 {
            return Err(SolverError::InvalidInput {
                what: "solver needs at least one iteration",
            });
        }
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(SolverError::InvalidInput {
                what: "solver limits must be finite",
            });
        }
        if lo > hi {
            return Err(SolverError::ConvergenceFailed {
                what: format!("lower limit {lo} exceeds upper limit {hi}"),
                iterations: 0,
            });
        }

        let mut eval = |x: f64| -> SolverResult<f64> {
            let f = residual(x).map_err(|e| SolverError::ResidualFailed {
                at: x,
                what: e.to_string(),
            })?;
            if !f.is_finite() {
                return Err(SolverError::ResidualFailed {
                    at: x,
                    what: "residual is not finite".into(),
                });
            }
            Ok(f)
        };

        let mut x0 = self.guesses.0.clamp(lo, hi);
        let mut x1 = self.guesses.1.clamp(lo, hi);
        if x0 == x1 {
            // Both guesses collapsed onto the same point; step away from it.
            let step = (x0.abs() * 1e-3).max(tol);
            x1 = if x0 + step <= hi { x0 + step } else { x0 - step };
            if x1 < lo {
                return Err(SolverError::ConvergenceFailed {
                    what: format!("bracket [{lo}, {hi}] too narrow to iterate"),
                    iterations: 0,
                });
            }
        }

        let mut f0 = eval(x0)?;
        if f0.abs() < tol {
            return Ok(SecantResult {
                root: x0,
                residual: f0,
                iterations: 0,
            });
        }
        let mut f1 = eval(x1)?;

        for iteration in 1..=self.config.max_iterations {
            if f1.abs() < tol {
                return Ok(SecantResult {
                    root: x1,
                    residual: f1,
                    iterations: iteration - 1,
                });
            }

            let slope = f1 - f0;
            if slope == 0.0 {
                return Err(SolverError::ConvergenceFailed {
                    what: format!("residual slope vanished at {x1}"),
                    iterations: iteration,
                });
            }
            let raw = x1 - f1 * (x1 - x0) / slope;
            if !raw.is_finite() {
                return Err(SolverError::ConvergenceFailed {
                    what: "secant step is not finite".into(),
                    iterations: iteration,
                });
            }

            let x2 = raw.clamp(lo, hi);
            let pinned = x2 != raw;
            if pinned {
                if x2 == x1 {
                    return Err(SolverError::ConvergenceFailed {
                        what: format!("root lies outside limits [{lo}, {hi}]"),
                        iterations: iteration,
                    });
                }
                warn!(iteration, estimate = raw, clamped = x2, "secant estimate clamped to limit");
            }

            let f2 = eval(x2)?;
            debug!(iteration, estimate = x2, residual = f2, "secant iteration");

            if !pinned && (x2 - x1).abs() <= tol * x2.abs().max(1.0) {
                return Ok(SecantResult {
                    root: x2,
                    residual: f2,
                    iterations: iteration,
                });
            }

            x0 = x1;
            f0 = f1;
            x1 = x2;
            f1 = f2;
        }

        Err(SolverError::ConvergenceFailed {
            what: format!("no root within tolerance {tol}"),
            iterations: self.config.max_iterations,
        })
    }
}
