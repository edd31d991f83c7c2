//! Ideal mixtures of tabulated species.

use crate::error::{GasError, GasResult};
use crate::species::Species;

/// Mole fractions of an ideal mixture, normalised to sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    fractions: Vec<(Species, f64)>,
}

impl Composition {
    pub fn pure(species: Species) -> Self {
        Self {
            fractions: vec![(species, 1.0)],
        }
    }

    /// Mixture from unnormalised mole fractions. Zero entries are dropped.
    pub fn new_mole_fractions(fractions: Vec<(Species, f64)>) -> GasResult<Self> {
        if fractions.iter().any(|(_, x)| !x.is_finite() || *x < 0.0) {
            return Err(GasError::NonPhysical {
                what: "mole fractions must be finite and non-negative",
            });
        }
        let total: f64 = fractions.iter().map(|(_, x)| x).sum();
        if total <= 0.0 {
            return Err(GasError::InvalidArg {
                what: "composition needs at least one positive mole fraction",
            });
        }
        Ok(Self {
            fractions: fractions
                .into_iter()
                .filter(|(_, x)| *x > 0.0)
                .map(|(s, x)| (s, x / total))
                .collect(),
        })
    }

    /// Mixture molar mass [kg/kmol].
    pub fn molar_mass(&self) -> f64 {
        self.fractions.iter().map(|(s, x)| x * s.molar_mass()).sum()
    }

    /// Mixture γ from the mole-weighted molar heat capacity, cp_i/R = γ_i/(γ_i - 1).
    pub fn gamma(&self) -> f64 {
        let cp_over_r: f64 = self
            .fractions
            .iter()
            .map(|(s, x)| x * s.gamma() / (s.gamma() - 1.0))
            .sum();
        cp_over_r / (cp_over_r - 1.0)
    }
}
