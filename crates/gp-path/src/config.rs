//! Typed facility configuration.

use core::fmt;
use core::str::FromStr;

use crate::error::{PathError, PathResult};
use crate::topology::{FacilityFlags, FacilityType};
use gp_components::{
    DiaphragmModel, DriverConfig, NozzleConfig, TestSectionConfig, TubeConfig, TubeMode,
};
use gp_core::StageRole;

/// Theoretical/experimental selection for the shock tube and acceleration tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    FullyTheoretical,
    FullyExperimental,
    TheoreticalShockTubeExperimentalAccelerationTube,
    ExperimentalShockTubeTheoreticalAccelerationTube,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::FullyTheoretical,
        Mode::FullyExperimental,
        Mode::TheoreticalShockTubeExperimentalAccelerationTube,
        Mode::ExperimentalShockTubeTheoreticalAccelerationTube,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::FullyTheoretical => "fully_theoretical",
            Mode::FullyExperimental => "fully_experimental",
            Mode::TheoreticalShockTubeExperimentalAccelerationTube => {
                "theoretical_shock_tube_experimental_acceleration_tube"
            }
            Mode::ExperimentalShockTubeTheoreticalAccelerationTube => {
                "experimental_shock_tube_theoretical_acceleration_tube"
            }
        }
    }

    /// Mode of the shock tube. The secondary driver follows it.
    pub fn shock_tube(self) -> TubeMode {
        match self {
            Mode::FullyTheoretical | Mode::TheoreticalShockTubeExperimentalAccelerationTube => {
                TubeMode::Theoretical
            }
            Mode::FullyExperimental | Mode::ExperimentalShockTubeTheoreticalAccelerationTube => {
                TubeMode::Experimental
            }
        }
    }

    pub fn acceleration_tube(self) -> TubeMode {
        match self {
            Mode::FullyTheoretical | Mode::ExperimentalShockTubeTheoreticalAccelerationTube => {
                TubeMode::Theoretical
            }
            Mode::FullyExperimental | Mode::TheoreticalShockTubeExperimentalAccelerationTube => {
                TubeMode::Experimental
            }
        }
    }

    /// Mode applied to the tube in `role`.
    pub fn for_role(self, role: StageRole) -> TubeMode {
        match role {
            StageRole::AccelerationTube => self.acceleration_tube(),
            _ => self.shock_tube(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| PathError::configuration(None, format!("unknown mode '{s}'")))
    }
}

/// Complete, typed description of one facility condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityConfig {
    pub flags: FacilityFlags,
    pub mode: Mode,
    pub driver: DriverConfig,
    pub primary_diaphragm: DiaphragmModel,
    pub secondary_driver: Option<TubeConfig>,
    pub secondary_diaphragm: DiaphragmModel,
    pub shock_tube: TubeConfig,
    pub tertiary_diaphragm: DiaphragmModel,
    pub acceleration_tube: Option<TubeConfig>,
    pub nozzle: Option<NozzleConfig>,
    pub test_section: TestSectionConfig,
}

impl FacilityConfig {
    /// Check that every stage the flags call for has a configuration.
    pub fn validate(&self) -> PathResult<()> {
        self.driver
            .validate()
            .map_err(|e| PathError::from_component(StageRole::Driver, e))?;

        for (role, diaphragm) in [
            (StageRole::PrimaryDiaphragm, &self.primary_diaphragm),
            (StageRole::SecondaryDiaphragm, &self.secondary_diaphragm),
            (StageRole::TertiaryDiaphragm, &self.tertiary_diaphragm),
        ] {
            diaphragm
                .validate()
                .map_err(|e| PathError::from_component(role, e))?;
        }

        if self.flags.secondary_driver && self.secondary_driver.is_none() {
            return Err(PathError::configuration(
                Some(StageRole::SecondaryDriver),
                "secondary driver enabled but not configured",
            ));
        }
        if self.flags.facility_type == FacilityType::ExpansionTube
            && self.acceleration_tube.is_none()
        {
            return Err(PathError::configuration(
                Some(StageRole::AccelerationTube),
                "expansion tube needs an acceleration tube configuration",
            ));
        }
        // Reflected-shock gas is at rest and cannot enter a test section directly.
        if self.flags.facility_type == FacilityType::ReflectedShockTunnel && !self.flags.nozzle {
            return Err(PathError::configuration(
                Some(StageRole::Nozzle),
                "reflected shock tunnel needs a nozzle",
            ));
        }
        if self.flags.nozzle && self.nozzle.is_none() {
            return Err(PathError::configuration(
                Some(StageRole::Nozzle),
                "nozzle enabled but no area ratio was given",
            ));
        }

        for (role, tube) in self.tubes() {
            let mut tube = tube.clone();
            tube.mode = self.mode.for_role(role);
            tube.validate()
                .map_err(|e| PathError::from_component(role, e))?;
        }
        if let Some(nozzle) = &self.nozzle {
            nozzle
                .validate()
                .map_err(|e| PathError::from_component(StageRole::Nozzle, e))?;
        }
        Ok(())
    }

    /// Tube configurations the flags enable, keyed by role.
    pub fn tubes(&self) -> Vec<(StageRole, &TubeConfig)> {
        let mut tubes = Vec::new();
        if self.flags.secondary_driver {
            if let Some(sd) = &self.secondary_driver {
                tubes.push((StageRole::SecondaryDriver, sd));
            }
        }
        tubes.push((StageRole::ShockTube, &self.shock_tube));
        if self.flags.facility_type == FacilityType::ExpansionTube {
            if let Some(at) = &self.acceleration_tube {
                tubes.push((StageRole::AccelerationTube, at));
            }
        }
        tubes
    }

    pub fn tube(&self, role: StageRole) -> Option<&TubeConfig> {
        self.tubes()
            .into_iter()
            .find(|(r, _)| *r == role)
            .map(|(_, t)| t)
    }

    pub fn diaphragm(&self, role: StageRole) -> Option<&DiaphragmModel> {
        match role {
            StageRole::PrimaryDiaphragm => Some(&self.primary_diaphragm),
            StageRole::SecondaryDiaphragm => Some(&self.secondary_diaphragm),
            StageRole::TertiaryDiaphragm => Some(&self.tertiary_diaphragm),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_splits_per_tube() {
        let m = Mode::TheoreticalShockTubeExperimentalAccelerationTube;
        assert_eq!(m.shock_tube(), TubeMode::Theoretical);
        assert_eq!(m.acceleration_tube(), TubeMode::Experimental);
        assert_eq!(m.for_role(StageRole::SecondaryDriver), TubeMode::Theoretical);

        let m = Mode::ExperimentalShockTubeTheoreticalAccelerationTube;
        assert_eq!(m.for_role(StageRole::SecondaryDriver), TubeMode::Experimental);
        assert_eq!(m.for_role(StageRole::AccelerationTube), TubeMode::Theoretical);
    }

    #[test]
    fn mode_parse_round_trip() {
        for m in Mode::ALL {
            assert_eq!(m.as_str().parse::<Mode>().unwrap(), m);
        }
        assert!("mostly_theoretical".parse::<Mode>().is_err());
    }
}
