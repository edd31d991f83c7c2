//! Gas identity: what a facility section is filled with.

use crate::composition::Composition;
use crate::error::{GasError, GasResult};
use crate::species::Species;

/// How the thermodynamic constants of a gas are obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum GasKind {
    /// Ideal mixture of tabulated species.
    Mixture(Composition),
    /// User-supplied ratio of specific heats and specific gas constant [J/(kg·K)].
    Custom { gamma: f64, r: f64 },
}

/// Named gas used to fill a facility section.
#[derive(Debug, Clone, PartialEq)]
pub struct Gas {
    name: String,
    kind: GasKind,
}

impl Gas {
    /// Pure gas from the species table.
    pub fn pure(species: Species) -> Self {
        Self {
            name: species.name().to_string(),
            kind: GasKind::Mixture(Composition::pure(species)),
        }
    }

    /// Named ideal mixture.
    pub fn mixture(name: impl Into<String>, composition: Composition) -> Self {
        Self {
            name: name.into(),
            kind: GasKind::Mixture(composition),
        }
    }

    /// Gas with user-supplied constants.
    pub fn custom(name: impl Into<String>, gamma: f64, r: f64) -> GasResult<Self> {
        if !gamma.is_finite() || gamma <= 1.0 {
            return Err(GasError::NonPhysical {
                what: "custom gas gamma must be finite and > 1",
            });
        }
        if !r.is_finite() || r <= 0.0 {
            return Err(GasError::NonPhysical {
                what: "custom gas constant must be positive and finite",
            });
        }
        Ok(Self {
            name: name.into(),
            kind: GasKind::Custom { gamma, r },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &GasKind {
        &self.kind
    }
}
