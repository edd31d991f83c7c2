//! Stable identifiers for facility stages.
//!
//! A `StageRole` names a position in the gas path ("shock_tube",
//! "secondary_diaphragm", ...). Roles are the keys of the object registry
//! and the targets of typed guess references, so their string forms are
//! stable and match the configuration file vocabulary.

use core::fmt;
use core::str::FromStr;

use crate::CoreError;

/// Component variant of a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    Driver,
    Diaphragm,
    Tube,
    Nozzle,
    TestSection,
}

impl StageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Diaphragm => "diaphragm",
            Self::Tube => "tube",
            Self::Nozzle => "nozzle",
            Self::TestSection => "test_section",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry role of a stage within a gas path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StageRole {
    Driver,
    PrimaryDiaphragm,
    SecondaryDriver,
    SecondaryDiaphragm,
    ShockTube,
    TertiaryDiaphragm,
    AccelerationTube,
    Nozzle,
    TestSection,
}

impl StageRole {
    pub const ALL: [StageRole; 9] = [
        StageRole::Driver,
        StageRole::PrimaryDiaphragm,
        StageRole::SecondaryDriver,
        StageRole::SecondaryDiaphragm,
        StageRole::ShockTube,
        StageRole::TertiaryDiaphragm,
        StageRole::AccelerationTube,
        StageRole::Nozzle,
        StageRole::TestSection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::PrimaryDiaphragm => "primary_diaphragm",
            Self::SecondaryDriver => "secondary_driver",
            Self::SecondaryDiaphragm => "secondary_diaphragm",
            Self::ShockTube => "shock_tube",
            Self::TertiaryDiaphragm => "tertiary_diaphragm",
            Self::AccelerationTube => "acceleration_tube",
            Self::Nozzle => "nozzle",
            Self::TestSection => "test_section",
        }
    }

    /// Component variant that fills this role.
    pub fn kind(self) -> StageKind {
        match self {
            Self::Driver => StageKind::Driver,
            Self::PrimaryDiaphragm | Self::SecondaryDiaphragm | Self::TertiaryDiaphragm => {
                StageKind::Diaphragm
            }
            Self::SecondaryDriver | Self::ShockTube | Self::AccelerationTube => StageKind::Tube,
            Self::Nozzle => StageKind::Nozzle,
            Self::TestSection => StageKind::TestSection,
        }
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRole { name: s.to_string() })
    }
}

/// Computed stage quantity that a later stage may reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum StageField {
    /// Resolved shock speed of a tube [m/s]
    ShockSpeed,
    /// Lab-frame velocity of the stage exit state [m/s]
    ExitVelocity,
}

impl StageField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShockSpeed => "shock_speed",
            Self::ExitVelocity => "exit_velocity",
        }
    }
}

impl fmt::Display for StageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for role in StageRole::ALL {
            assert_eq!(role.as_str().parse::<StageRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let err = "nozzle_throat".parse::<StageRole>().unwrap_err();
        assert!(err.to_string().contains("nozzle_throat"));
    }

    #[test]
    fn diaphragm_roles_share_kind() {
        assert_eq!(StageRole::SecondaryDiaphragm.kind(), StageKind::Diaphragm);
        assert_eq!(StageRole::TertiaryDiaphragm.kind(), StageKind::Diaphragm);
        assert_eq!(StageRole::SecondaryDriver.kind(), StageKind::Tube);
    }
}
