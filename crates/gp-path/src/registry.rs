//! Role-keyed index of evaluated stages.

use std::collections::BTreeMap;

use crate::error::{PathError, PathResult};
use gp_components::FacilityComponent;
use gp_core::{StageField, StageRole};
use gp_solver::ReferenceLookup;

/// What the registry keeps about one stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegistryEntry {
    /// Position of the stage in the gas path
    pub index: usize,
    /// Resolved shock speed [m/s], tubes only
    pub shock_speed: Option<f64>,
    /// Lab-frame exit velocity [m/s]
    pub exit_velocity: Option<f64>,
}

impl RegistryEntry {
    /// Referenceable fields of an evaluated stage at position `index`.
    pub fn from_stage(index: usize, stage: &dyn FacilityComponent) -> Self {
        Self {
            index,
            shock_speed: stage.field_value(StageField::ShockSpeed),
            exit_velocity: stage.field_value(StageField::ExitVelocity),
        }
    }
}

/// Append-only map from stage role to evaluated stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectRegistry {
    entries: BTreeMap<StageRole, RegistryEntry>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage. A role can only be registered once.
    pub fn register(&mut self, role: StageRole, entry: RegistryEntry) -> PathResult<()> {
        if self.entries.contains_key(&role) {
            return Err(PathError::topology(
                Some(role),
                "stage role registered twice",
            ));
        }
        self.entries.insert(role, entry);
        Ok(())
    }

    pub fn get(&self, role: StageRole) -> Option<&RegistryEntry> {
        self.entries.get(&role)
    }

    pub fn index_of(&self, role: StageRole) -> Option<usize> {
        self.entries.get(&role).map(|e| e.index)
    }

    pub fn contains(&self, role: StageRole) -> bool {
        self.entries.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn roles(&self) -> impl Iterator<Item = StageRole> + '_ {
        self.entries.keys().copied()
    }
}

impl ReferenceLookup for ObjectRegistry {
    fn stage_value(&self, stage: StageRole, field: StageField) -> Option<f64> {
        let entry = self.entries.get(&stage)?;
        match field {
            StageField::ShockSpeed => entry.shock_speed,
            StageField::ExitVelocity => entry.exit_velocity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, shock_speed: Option<f64>) -> RegistryEntry {
        RegistryEntry {
            index,
            shock_speed,
            exit_velocity: Some(0.0),
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut reg = ObjectRegistry::new();
        reg.register(StageRole::Driver, entry(0, None)).unwrap();
        reg.register(StageRole::ShockTube, entry(2, Some(1500.0)))
            .unwrap();
        assert_eq!(reg.index_of(StageRole::ShockTube), Some(2));
        assert_eq!(
            reg.stage_value(StageRole::ShockTube, StageField::ShockSpeed),
            Some(1500.0)
        );
        assert_eq!(
            reg.stage_value(StageRole::Driver, StageField::ShockSpeed),
            None
        );
        assert_eq!(
            reg.stage_value(StageRole::Nozzle, StageField::ExitVelocity),
            None
        );
    }

    #[test]
    fn duplicate_role_rejected() {
        let mut reg = ObjectRegistry::new();
        reg.register(StageRole::Driver, entry(0, None)).unwrap();
        let err = reg.register(StageRole::Driver, entry(1, None)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Topology);
    }
}
