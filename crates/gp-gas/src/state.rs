//! Gas state snapshots.

use crate::error::{GasError, GasResult};
use crate::gas::Gas;
use gp_core::units::{Density, Pressure, Temperature, Velocity, mps};

/// Raw fields handed to [`GasState::from_parts`] by a gas model.
#[derive(Debug, Clone)]
pub struct StateParts {
    pub p: Pressure,
    pub t: Temperature,
    pub rho: Density,
    /// Lab-frame velocity
    pub u: Velocity,
    /// Speed of sound
    pub a: Velocity,
    pub gamma: f64,
    /// Specific gas constant [J/(kg·K)]
    pub r: f64,
    pub gas: Gas,
    pub model: String,
}

/// Immutable thermodynamic snapshot produced by a [`crate::GasModel`].
///
/// Every field is derived by the model that built the state; consumers only
/// read it, or take a re-framed copy through [`GasState::with_velocity`].
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    p: Pressure,
    t: Temperature,
    rho: Density,
    u: Velocity,
    a: Velocity,
    gamma: f64,
    r: f64,
    gas: Gas,
    model: String,
}

impl GasState {
    /// Build a state, rejecting non-positive or non-finite p, T, ρ and a.
    pub fn from_parts(parts: StateParts) -> GasResult<Self> {
        validation::validate_pressure(parts.p)?;
        validation::validate_temperature(parts.t)?;
        validation::validate_density(parts.rho)?;
        validation::validate_speed_of_sound(parts.a)?;
        validation::validate_gamma(parts.gamma)?;
        if !parts.u.value.is_finite() {
            return Err(GasError::NonPhysical {
                what: "velocity must be finite",
            });
        }

        Ok(Self {
            p: parts.p,
            t: parts.t,
            rho: parts.rho,
            u: parts.u,
            a: parts.a,
            gamma: parts.gamma,
            r: parts.r,
            gas: parts.gas,
            model: parts.model,
        })
    }

    pub fn pressure(&self) -> Pressure {
        self.p
    }

    pub fn temperature(&self) -> Temperature {
        self.t
    }

    pub fn density(&self) -> Density {
        self.rho
    }

    /// Lab-frame velocity.
    pub fn velocity(&self) -> Velocity {
        self.u
    }

    pub fn sound_speed(&self) -> Velocity {
        self.a
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Specific gas constant [J/(kg·K)].
    pub fn gas_constant(&self) -> f64 {
        self.r
    }

    /// Specific heat at constant pressure [J/(kg·K)].
    pub fn cp(&self) -> f64 {
        self.gamma * self.r / (self.gamma - 1.0)
    }

    pub fn gas(&self) -> &Gas {
        &self.gas
    }

    /// Name of the model that produced this state.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Lab-frame Mach number u / a.
    pub fn mach_number(&self) -> f64 {
        self.u.value / self.a.value
    }

    /// Copy of this state moving at a different lab-frame velocity.
    pub fn with_velocity(&self, u: Velocity) -> Self {
        Self {
            u,
            ..self.clone()
        }
    }

    /// Copy of this state at rest.
    pub fn at_rest(&self) -> Self {
        self.with_velocity(mps(0.0))
    }
}

/// A gas state with the stable name used for cross-referencing ("state1", "state2", ...).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedState {
    pub name: String,
    pub state: GasState,
}

impl NamedState {
    pub fn new(name: impl Into<String>, state: GasState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }
}

/// Validation helpers for gas properties.
pub(crate) mod validation {
    use super::*;

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> GasResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> GasResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure density is positive and finite.
    pub fn validate_density(rho: Density) -> GasResult<()> {
        if !rho.value.is_finite() || rho.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure gamma (heat capacity ratio) is physically plausible.
    pub fn validate_gamma(gamma: f64) -> GasResult<()> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(GasError::NonPhysical {
                what: "gamma must be > 1 and finite",
            });
        }
        Ok(())
    }

    /// Ensure speed of sound is positive and finite.
    pub fn validate_speed_of_sound(a: Velocity) -> GasResult<()> {
        if !a.value.is_finite() || a.value <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "speed of sound must be positive and finite",
            });
        }
        Ok(())
    }
}
