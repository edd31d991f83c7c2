//! Stage sequence assembly.
//!
//! ```text
//! driver -> primary_diaphragm -> [secondary_driver -> secondary_diaphragm]
//!        -> shock_tube -> (tertiary_diaphragm | secondary_diaphragm)
//!        -> [acceleration_tube] -> [nozzle] -> test_section
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::{PathError, PathResult};
use gp_core::{StageKind, StageRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacilityType {
    ShockTube,
    ExpansionTube,
    ReflectedShockTunnel,
}

impl FacilityType {
    pub const ALL: [FacilityType; 3] = [
        FacilityType::ShockTube,
        FacilityType::ExpansionTube,
        FacilityType::ReflectedShockTunnel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacilityType::ShockTube => "shock_tube",
            FacilityType::ExpansionTube => "expansion_tube",
            FacilityType::ReflectedShockTunnel => "reflected_shock_tunnel",
        }
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacilityType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PathError::configuration(None, format!("unknown facility type '{s}'")))
    }
}

/// Flags that decide which stages exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacilityFlags {
    pub facility_type: FacilityType,
    pub secondary_driver: bool,
    pub nozzle: bool,
}

impl FacilityFlags {
    /// Every combination of flags.
    pub fn all() -> impl Iterator<Item = FacilityFlags> {
        FacilityType::ALL.into_iter().flat_map(|facility_type| {
            [(false, false), (false, true), (true, false), (true, true)]
                .into_iter()
                .map(move |(secondary_driver, nozzle)| FacilityFlags {
                    facility_type,
                    secondary_driver,
                    nozzle,
                })
        })
    }

    /// Whether a stage in `role` may be built under these flags.
    pub fn permits(&self, role: StageRole) -> bool {
        match role {
            StageRole::Driver
            | StageRole::PrimaryDiaphragm
            | StageRole::SecondaryDiaphragm
            | StageRole::ShockTube
            | StageRole::TestSection => true,
            StageRole::SecondaryDriver | StageRole::TertiaryDiaphragm => self.secondary_driver,
            StageRole::AccelerationTube => self.facility_type == FacilityType::ExpansionTube,
            StageRole::Nozzle => self.nozzle,
        }
    }
}

/// Ordered stage roles for one facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    flags: FacilityFlags,
    roles: Vec<StageRole>,
}

impl Topology {
    pub fn assemble(flags: FacilityFlags) -> Self {
        let mut roles = vec![StageRole::Driver, StageRole::PrimaryDiaphragm];
        if flags.secondary_driver {
            roles.push(StageRole::SecondaryDriver);
            roles.push(StageRole::SecondaryDiaphragm);
        }
        roles.push(StageRole::ShockTube);
        roles.push(Self::post_shock_tube_role(flags));
        if flags.facility_type == FacilityType::ExpansionTube {
            roles.push(StageRole::AccelerationTube);
        }
        if flags.nozzle {
            roles.push(StageRole::Nozzle);
        }
        roles.push(StageRole::TestSection);
        Self { flags, roles }
    }

    /// Role of the diaphragm at the downstream end of the shock tube.
    pub fn post_shock_tube_role(flags: FacilityFlags) -> StageRole {
        if flags.secondary_driver {
            StageRole::TertiaryDiaphragm
        } else {
            StageRole::SecondaryDiaphragm
        }
    }

    pub fn flags(&self) -> FacilityFlags {
        self.flags
    }

    pub fn roles(&self) -> &[StageRole] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn position(&self, role: StageRole) -> Option<usize> {
        self.roles.iter().position(|r| *r == role)
    }

    pub fn contains(&self, role: StageRole) -> bool {
        self.position(role).is_some()
    }

    /// Check the structural invariants of the sequence.
    pub fn validate(&self) -> PathResult<()> {
        for role in [
            StageRole::Driver,
            StageRole::PrimaryDiaphragm,
            StageRole::ShockTube,
            StageRole::TestSection,
        ] {
            let count = self.roles.iter().filter(|r| **r == role).count();
            if count != 1 {
                return Err(PathError::topology(
                    Some(role),
                    format!("expected exactly one {role}, found {count}"),
                ));
            }
        }

        for role in &self.roles {
            if !self.flags.permits(*role) {
                return Err(PathError::topology(
                    Some(*role),
                    "stage not permitted by facility flags",
                ));
            }
        }

        if self.roles.first() != Some(&StageRole::Driver)
            || self.roles.last() != Some(&StageRole::TestSection)
        {
            return Err(PathError::topology(
                None,
                "path must start at the driver and end at the test section",
            ));
        }

        // Sections alternate with diaphragms up to the acceleration tube.
        for pair in self.roles.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let needs_diaphragm = matches!(a.kind(), StageKind::Driver | StageKind::Tube)
                && a != StageRole::AccelerationTube;
            if needs_diaphragm && b.kind() != StageKind::Diaphragm {
                return Err(PathError::topology(
                    Some(b),
                    format!("{a} must be followed by a diaphragm"),
                ));
            }
        }

        if let Some(i) = self.position(StageRole::SecondaryDriver) {
            if self.roles.get(i + 1) != Some(&StageRole::SecondaryDiaphragm) {
                return Err(PathError::topology(
                    Some(StageRole::SecondaryDriver),
                    "secondary driver must be followed by the secondary diaphragm",
                ));
            }
        }

        let has_acceleration = self.contains(StageRole::AccelerationTube);
        let is_expansion = self.flags.facility_type == FacilityType::ExpansionTube;
        if has_acceleration != is_expansion {
            return Err(PathError::topology(
                Some(StageRole::AccelerationTube),
                "acceleration tube exists iff the facility is an expansion tube",
            ));
        }
        if self.contains(StageRole::Nozzle) != self.flags.nozzle {
            return Err(PathError::topology(
                Some(StageRole::Nozzle),
                "nozzle exists iff the nozzle flag is set",
            ));
        }
        Ok(())
    }
}
