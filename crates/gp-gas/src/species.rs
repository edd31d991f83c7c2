//! Chemical species definitions for facility gases.

use crate::error::{GasError, GasResult};

/// Species used to fill driver, shock-tube and acceleration-tube sections.
///
/// Properties are the low-temperature (calorically perfect) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Air (pseudo-pure, 79/21 N₂/O₂ by volume)
    Air,
    /// Nitrogen (N₂)
    N2,
    /// Oxygen (O₂)
    O2,
    /// Hydrogen (H₂)
    H2,
    /// Helium (He)
    He,
    /// Argon (Ar)
    Ar,
    /// Neon (Ne)
    Ne,
    /// Krypton (Kr)
    Kr,
    /// Xenon (Xe)
    Xe,
    /// Carbon dioxide (CO₂)
    CO2,
}

impl Species {
    pub const ALL: [Species; 10] = [
        Species::Air,
        Species::N2,
        Species::O2,
        Species::H2,
        Species::He,
        Species::Ar,
        Species::Ne,
        Species::Kr,
        Species::Xe,
        Species::CO2,
    ];

    /// Canonical lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Species::Air => "air",
            Species::N2 => "n2",
            Species::O2 => "o2",
            Species::H2 => "h2",
            Species::He => "he",
            Species::Ar => "ar",
            Species::Ne => "ne",
            Species::Kr => "kr",
            Species::Xe => "xe",
            Species::CO2 => "co2",
        }
    }

    /// Molar mass [kg/kmol].
    pub fn molar_mass(self) -> f64 {
        match self {
            Species::Air => 28.9647,
            Species::N2 => 28.0134,
            Species::O2 => 31.9988,
            Species::H2 => 2.01588,
            Species::He => 4.002602,
            Species::Ar => 39.948,
            Species::Ne => 20.1797,
            Species::Kr => 83.798,
            Species::Xe => 131.293,
            Species::CO2 => 44.0095,
        }
    }

    /// Ratio of specific heats at low temperature.
    pub fn gamma(self) -> f64 {
        match self {
            Species::He | Species::Ar | Species::Ne | Species::Kr | Species::Xe => 5.0 / 3.0,
            Species::Air | Species::N2 | Species::O2 | Species::H2 => 1.4,
            Species::CO2 => 1.289,
        }
    }

    /// Look up a species by name (case-insensitive, common aliases accepted).
    pub fn from_name(name: &str) -> GasResult<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let species = match lower.as_str() {
            "air" => Species::Air,
            "n2" | "nitrogen" => Species::N2,
            "o2" | "oxygen" => Species::O2,
            "h2" | "hydrogen" => Species::H2,
            "he" | "helium" => Species::He,
            "ar" | "argon" => Species::Ar,
            "ne" | "neon" => Species::Ne,
            "kr" | "krypton" => Species::Kr,
            "xe" | "xenon" => Species::Xe,
            "co2" | "carbon_dioxide" => Species::CO2,
            _ => {
                return Err(GasError::UnknownGas {
                    name: name.to_string(),
                });
            }
        };
        Ok(species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for species in Species::ALL {
            assert_eq!(Species::from_name(species.name()).unwrap(), species);
        }
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!(Species::from_name("Helium").unwrap(), Species::He);
        assert_eq!(Species::from_name(" AIR ").unwrap(), Species::Air);
    }

    #[test]
    fn unknown_species_rejected() {
        assert!(Species::from_name("argon-ish").is_err());
    }

    #[test]
    fn monatomic_gamma() {
        assert!((Species::He.gamma() - 5.0 / 3.0).abs() < 1e-12);
        assert!((Species::Air.gamma() - 1.4).abs() < 1e-12);
    }
}
