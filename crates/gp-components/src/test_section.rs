//! Test section: the flow over a model.
//!
//! A normal shock always stands ahead of the model (pitot tube). Optional
//! wedge and cone bodies add the attached oblique and conical shock states.

use crate::common::{check_finite, isentropic_pressure_ratio};
use crate::error::{ComponentError, ComponentResult};
use crate::oblique::{cone_shock_angle, wedge_shock_angle};
use crate::traits::{FacilityComponent, StageOutput};
use gp_core::units::{mps, pa};
use gp_core::{StageKind, StageRole};
use gp_gas::{GasModel, GasState, NamedState};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TestSectionConfig {
    pub wedge_angle_degrees: Option<f64>,
    pub cone_half_angle_degrees: Option<f64>,
}

/// Post-shock state over an inclined body.
#[derive(Debug, Clone)]
struct BodyShock {
    state: NamedState,
    shock_angle_degrees: f64,
}

/// Evaluated test section.
#[derive(Debug, Clone)]
pub struct TestSection {
    entrance: NamedState,
    normal: NamedState,
    wedge: Option<BodyShock>,
    cone: Option<BodyShock>,
    pitot_pressure: f64,
    total_temperature: f64,
}

impl TestSection {
    pub const NORMAL_STATE: &'static str = "state10f";
    pub const WEDGE_STATE: &'static str = "state10w";
    pub const CONE_STATE: &'static str = "state10c";

    pub fn evaluate(
        config: TestSectionConfig,
        entrance: NamedState,
        model: &dyn GasModel,
    ) -> ComponentResult<Self> {
        let state = &entrance.state;
        let mach = state.mach_number();
        if !mach.is_finite() || mach <= 1.0 {
            return Err(ComponentError::NonPhysical {
                what: "test section flow must be supersonic",
            });
        }

        // Stationary shock: gas enters at its lab velocity and leaves at w2.
        let jump = model.shock_jump(state, state.velocity())?;
        let normal = jump.state.with_velocity(jump.w2);
        let pitot_pressure = model.stagnation_state(&normal)?.pressure().value;
        let total_temperature = model.stagnation_state(state)?.temperature().value;
        check_finite(pitot_pressure, "pitot pressure")?;

        let wedge = config
            .wedge_angle_degrees
            .map(|angle| Self::wedge(model, state, angle))
            .transpose()?;
        let cone = config
            .cone_half_angle_degrees
            .map(|angle| Self::cone(model, state, angle))
            .transpose()?;

        debug!(mach, pitot_pressure, total_temperature, "test section evaluated");

        Ok(Self {
            entrance,
            normal: NamedState::new(Self::NORMAL_STATE, normal),
            wedge,
            cone,
            pitot_pressure,
            total_temperature,
        })
    }

    /// Shock at angle `beta` to a stream: normal component jumps, tangential is kept.
    fn oblique_jump(
        model: &dyn GasModel,
        state: &GasState,
        beta: f64,
    ) -> ComponentResult<GasState> {
        let u = state.velocity().value;
        let jump = model.shock_jump(state, mps(u * beta.sin()))?;
        let tangential = u * beta.cos();
        let speed = jump.w2.value.hypot(tangential);
        Ok(jump.state.with_velocity(mps(speed)))
    }

    fn wedge(model: &dyn GasModel, state: &GasState, angle: f64) -> ComponentResult<BodyShock> {
        let gamma = model.gamma_and_r(state).0;
        let beta = wedge_shock_angle(state.mach_number(), angle.to_radians(), gamma)?;
        let post = Self::oblique_jump(model, state, beta)?;
        Ok(BodyShock {
            state: NamedState::new(Self::WEDGE_STATE, post),
            shock_angle_degrees: beta.to_degrees(),
        })
    }

    fn cone(model: &dyn GasModel, state: &GasState, angle: f64) -> ComponentResult<BodyShock> {
        let gamma = model.gamma_and_r(state).0;
        let solution = cone_shock_angle(state.mach_number(), angle.to_radians(), gamma)?;
        // Isentropic compression from behind the shock to the cone surface.
        let post = Self::oblique_jump(model, state, solution.beta)?;
        let total = model.stagnation_state(&post)?;
        let p_surface =
            total.pressure().value * isentropic_pressure_ratio(gamma, solution.surface_mach);
        let surface = model.isentropic_to_pressure(&total, pa(p_surface))?;
        let u = solution.surface_mach * model.speed_of_sound(&surface).value;
        Ok(BodyShock {
            state: NamedState::new(Self::CONE_STATE, surface.with_velocity(mps(u))),
            shock_angle_degrees: solution.beta.to_degrees(),
        })
    }

    pub fn pitot_pressure(&self) -> f64 {
        self.pitot_pressure
    }

    pub fn total_temperature(&self) -> f64 {
        self.total_temperature
    }

    pub fn wedge_state(&self) -> Option<&NamedState> {
        self.wedge.as_ref().map(|w| &w.state)
    }

    pub fn cone_state(&self) -> Option<&NamedState> {
        self.cone.as_ref().map(|c| &c.state)
    }

    pub fn wedge_shock_angle_degrees(&self) -> Option<f64> {
        self.wedge.as_ref().map(|w| w.shock_angle_degrees)
    }

    pub fn cone_shock_angle_degrees(&self) -> Option<f64> {
        self.cone.as_ref().map(|c| c.shock_angle_degrees)
    }
}

impl FacilityComponent for TestSection {
    fn kind(&self) -> StageKind {
        StageKind::TestSection
    }

    fn role(&self) -> StageRole {
        StageRole::TestSection
    }

    fn entrance_state(&self) -> &NamedState {
        &self.entrance
    }

    fn exit_state(&self) -> &NamedState {
        &self.normal
    }

    fn states(&self) -> Vec<&NamedState> {
        let mut states = vec![&self.entrance, &self.normal];
        states.extend(self.wedge.as_ref().map(|w| &w.state));
        states.extend(self.cone.as_ref().map(|c| &c.state));
        states
    }

    fn outputs(&self) -> Vec<StageOutput> {
        let mut out = vec![
            StageOutput::new("pitot_pressure", self.pitot_pressure, "Pa"),
            StageOutput::new("total_temperature", self.total_temperature, "K"),
        ];
        if let Some(angle) = self.wedge_shock_angle_degrees() {
            out.push(StageOutput::new("wedge_shock_angle", angle, "deg"));
        }
        if let Some(angle) = self.cone_shock_angle_degrees() {
            out.push(StageOutput::new("cone_shock_angle", angle, "deg"));
        }
        out
    }
}
