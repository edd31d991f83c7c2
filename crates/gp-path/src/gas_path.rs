//! Gas path assembly and sequential evaluation.

use crate::config::FacilityConfig;
use crate::error::{PathError, PathResult};
use crate::registry::{ObjectRegistry, RegistryEntry};
use crate::topology::{FacilityFlags, FacilityType, Topology};
use gp_components::{
    ComponentError, Diaphragm, Driver, FacilityComponent, Nozzle, TestSection, Tube, TubeExit,
    TubeMode,
};
use gp_core::units::Velocity;
use gp_core::{StageField, StageKind, StageRole};
use gp_gas::{GasModel, NamedState};
use tracing::info;

/// Evaluated facility: stages in flow order plus the registry that indexes them.
#[derive(Debug)]
pub struct GasPath {
    topology: Topology,
    stages: Vec<Box<dyn FacilityComponent>>,
    registry: ObjectRegistry,
}

impl GasPath {
    /// Assemble the topology for `config` and evaluate every stage in order.
    pub fn evaluate(config: &FacilityConfig, model: &dyn GasModel) -> PathResult<Self> {
        config.validate()?;
        let topology = Topology::assemble(config.flags);
        topology.validate()?;
        check_references(config, &topology)?;

        info!(
            facility = %config.flags.facility_type,
            mode = %config.mode,
            stages = topology.len(),
            model = model.name(),
            "evaluating gas path"
        );

        let mut path = Self {
            stages: Vec::with_capacity(topology.len()),
            registry: ObjectRegistry::new(),
            topology,
        };
        let roles = path.topology.roles().to_vec();
        for role in roles {
            let stage = path.build_stage(role, config, model)?;
            path.push(stage)?;
        }
        Ok(path)
    }

    fn build_stage(
        &self,
        role: StageRole,
        config: &FacilityConfig,
        model: &dyn GasModel,
    ) -> PathResult<Box<dyn FacilityComponent>> {
        let component = |e: ComponentError| PathError::from_component(role, e);

        let stage: Box<dyn FacilityComponent> = match role.kind() {
            StageKind::Driver => {
                Box::new(Driver::evaluate(config.driver.clone(), model).map_err(component)?)
            }
            StageKind::Diaphragm => {
                let diaphragm = config.diaphragm(role).copied().ok_or_else(|| {
                    PathError::configuration(Some(role), "no diaphragm configuration")
                })?;
                Box::new(
                    Diaphragm::evaluate(role, diaphragm, self.upstream_exit(role)?, model)
                        .map_err(component)?,
                )
            }
            StageKind::Tube => {
                let mut tube = config
                    .tube(role)
                    .cloned()
                    .ok_or_else(|| PathError::configuration(Some(role), "no tube configuration"))?;
                tube.mode = config.mode.for_role(role);
                tube.exit = tube_exit(role, config.flags);
                Box::new(
                    Tube::evaluate(role, tube, self.upstream_exit(role)?, model, &self.registry)
                        .map_err(component)?,
                )
            }
            StageKind::Nozzle => {
                let nozzle = config.nozzle.ok_or_else(|| {
                    PathError::configuration(Some(role), "nozzle enabled but no area ratio")
                })?;
                Box::new(
                    Nozzle::evaluate(nozzle, self.upstream_exit(role)?, model)
                        .map_err(component)?,
                )
            }
            StageKind::TestSection => Box::new(
                TestSection::evaluate(config.test_section, self.upstream_exit(role)?, model)
                    .map_err(component)?,
            ),
        };
        Ok(stage)
    }

    fn upstream_exit(&self, role: StageRole) -> PathResult<NamedState> {
        self.stages
            .last()
            .map(|s| s.exit_state().clone())
            .ok_or_else(|| PathError::topology(Some(role), "stage has no upstream stage"))
    }

    /// Append an evaluated stage, enforcing order, continuity and positivity.
    fn push(&mut self, stage: Box<dyn FacilityComponent>) -> PathResult<()> {
        let role = stage.role();
        let index = self.stages.len();

        if self.topology.roles().get(index) != Some(&role) || !self.topology.flags().permits(role)
        {
            return Err(PathError::topology(
                Some(role),
                format!("stage not expected at position {index}"),
            ));
        }
        if let Some(prev) = self.stages.last() {
            if stage.entrance_state() != prev.exit_state() {
                return Err(PathError::topology(
                    Some(role),
                    format!(
                        "entrance state '{}' does not match upstream exit '{}'",
                        stage.entrance_state().name,
                        prev.exit_state().name
                    ),
                ));
            }
        }
        let shock_speed = stage.field_value(StageField::ShockSpeed);
        if let Some(vs) = shock_speed {
            if !(vs.is_finite() && vs > 0.0) {
                return Err(PathError::physical_state(
                    Some(role),
                    format!("resolved shock speed {vs} m/s is not positive"),
                ));
            }
        }

        let exit = stage.exit_state();
        info!(
            stage = %role,
            exit = %exit.name,
            p = exit.state.pressure().value,
            t = exit.state.temperature().value,
            u = exit.state.velocity().value,
            vs = shock_speed,
            "stage evaluated"
        );

        self.registry
            .register(role, RegistryEntry::from_stage(index, stage.as_ref()))?;
        self.stages.push(stage);
        Ok(())
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    pub fn stages(&self) -> &[Box<dyn FacilityComponent>] {
        &self.stages
    }

    pub fn roles(&self) -> Vec<StageRole> {
        self.stages.iter().map(|s| s.role()).collect()
    }

    pub fn stage(&self, role: StageRole) -> Option<&dyn FacilityComponent> {
        self.registry
            .index_of(role)
            .and_then(|i| self.stages.get(i))
            .map(|s| s.as_ref())
    }

    pub fn shock_speed(&self, role: StageRole) -> Option<Velocity> {
        self.stage(role).and_then(|s| s.shock_speed())
    }

    /// Exit state of the last stage (behind the test-section normal shock).
    pub fn exit_state(&self) -> Option<&NamedState> {
        self.stages.last().map(|s| s.exit_state())
    }

    /// Every distinct named state in flow order.
    pub fn states(&self) -> Vec<&NamedState> {
        let mut seen: Vec<&NamedState> = Vec::new();
        for stage in &self.stages {
            for state in stage.entrance_states().into_iter().chain(stage.states()) {
                if !seen.iter().any(|s| s.name == state.name) {
                    seen.push(state);
                }
            }
        }
        seen
    }

    /// Look up a state by name ("state2", "state10f", ...).
    pub fn state(&self, name: &str) -> Option<&NamedState> {
        self.states().into_iter().find(|s| s.name == name)
    }
}

/// Exit state selection for a tube in `role`.
fn tube_exit(role: StageRole, flags: FacilityFlags) -> TubeExit {
    match role {
        StageRole::AccelerationTube => TubeExit::ExpandedEntrance,
        StageRole::ShockTube if flags.facility_type == FacilityType::ReflectedShockTunnel => {
            TubeExit::Reflected
        }
        _ => TubeExit::ShockedFill,
    }
}

/// Every guess or limit reference must point at a stage evaluated earlier.
fn check_references(config: &FacilityConfig, topology: &Topology) -> PathResult<()> {
    for (role, tube) in config.tubes() {
        if config.mode.for_role(role) == TubeMode::Experimental {
            continue;
        }
        let Some(position) = topology.position(role) else {
            continue;
        };
        for reference in tube.guesses.references() {
            match topology.position(reference.stage) {
                None => {
                    return Err(PathError::configuration(
                        Some(role),
                        format!("reference to {} which is not in this facility", reference.stage),
                    ));
                }
                Some(p) if p >= position => {
                    return Err(PathError::configuration(
                        Some(role),
                        format!(
                            "forward reference to {} of {}",
                            reference.field, reference.stage
                        ),
                    ));
                }
                Some(_) => {}
            }
            if reference.field == StageField::ShockSpeed
                && reference.stage.kind() != StageKind::Tube
            {
                return Err(PathError::configuration(
                    Some(role),
                    format!("{} has no shock speed", reference.stage),
                ));
            }
        }
    }
    Ok(())
}
