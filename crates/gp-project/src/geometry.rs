//! Facility geometry files.
//!
//! A geometry file describes a physical facility: its type, which optional
//! sections it has, the tube dimensions and the nozzle's geometric area
//! ratio. When a condition names one, its flags take precedence over the
//! flat `facility_type` / `secondary_driver` / `nozzle` parameters.

use std::collections::BTreeMap;
use std::path::Path;

use gp_core::StageKind;
use gp_core::StageRole;
use gp_path::{FacilityFlags, FacilityType};
use serde::Deserialize;

use crate::{ProjectError, ProjectResult};

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct TubeGeometry {
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub diameter: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacilityGeometry {
    #[serde(default)]
    pub name: Option<String>,
    pub facility_type: String,
    #[serde(default)]
    pub secondary_driver: bool,
    #[serde(default)]
    pub nozzle: bool,
    #[serde(default)]
    pub nozzle_geometric_area_ratio: Option<f64>,
    /// Keyed by tube role: `secondary_driver`, `shock_tube`, `acceleration_tube`.
    #[serde(default)]
    pub tubes: BTreeMap<String, TubeGeometry>,
}

impl FacilityGeometry {
    pub fn load(path: &Path) -> ProjectResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ProjectResult<Self> {
        let geometry: FacilityGeometry = serde_yaml::from_str(content)?;
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> ProjectResult<()> {
        self.facility_type()?;
        for (name, tube) in &self.tubes {
            let role = name
                .parse::<StageRole>()
                .ok()
                .filter(|r| r.kind() == StageKind::Tube)
                .ok_or_else(|| ProjectError::Geometry {
                    what: format!("'{name}' is not a tube"),
                })?;
            for (what, value) in [("length", tube.length), ("diameter", tube.diameter)] {
                if let Some(v) = value {
                    if !(v.is_finite() && v > 0.0) {
                        return Err(ProjectError::Geometry {
                            what: format!("{role} {what} must be positive"),
                        });
                    }
                }
            }
        }
        if let Some(ar) = self.nozzle_geometric_area_ratio {
            if !(ar.is_finite() && ar >= 1.0) {
                return Err(ProjectError::Geometry {
                    what: "nozzle area ratio must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn facility_type(&self) -> ProjectResult<FacilityType> {
        self.facility_type
            .parse::<FacilityType>()
            .map_err(|e| ProjectError::Geometry { what: e.to_string() })
    }

    pub fn flags(&self) -> ProjectResult<FacilityFlags> {
        Ok(FacilityFlags {
            facility_type: self.facility_type()?,
            secondary_driver: self.secondary_driver,
            nozzle: self.nozzle,
        })
    }

    pub fn tube(&self, role: StageRole) -> Option<&TubeGeometry> {
        self.tubes.get(role.as_str())
    }
}
