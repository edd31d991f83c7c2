//! Tube section: a shock driven into a quiescent fill gas.
//!
//! The gas arriving from upstream unsteadily expands into the tube while a
//! shock processes the fill gas. In theoretical mode the shock speed is the
//! root of a velocity-matching residual across the contact surface; in
//! experimental mode it is supplied.

use crate::common::{ReflectedMach, reflected_shock};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{FacilityComponent, StageOutput};
use gp_core::units::{Length, Pressure, Temperature, Velocity, mps};
use gp_core::{StageKind, StageRole};
use gp_gas::{Gas, GasModel, GasState, NamedState};
use gp_solver::{
    ExpansionTarget, ReferenceLookup, ShockSpeedGuesses, SolverError, UnsteadyExpansionIntegrator,
};
use tracing::debug;

/// Lowest shock speed the solver may try, as a multiple of the fill sound speed
const MIN_SHOCK_MACH: f64 = 1.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TubeMode {
    Theoretical,
    Experimental,
}

/// Velocity the unsteadily expanded gas must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandTo {
    /// Flow velocity behind the shock (ideal contact surface).
    FlowBehindShock,
    /// Shock speed itself.
    ShockSpeed,
}

/// Which computed state leaves the tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TubeExit {
    /// Shock-processed fill gas.
    ShockedFill,
    /// Unsteadily expanded entrance gas.
    ExpandedEntrance,
    /// Shocked fill gas stagnated by a reflected shock.
    Reflected,
}

/// Names of the states a tube produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeStateNames {
    pub fill: String,
    pub shocked: String,
    pub expanded: String,
    pub reflected: String,
}

impl TubeStateNames {
    pub fn for_role(role: StageRole) -> Self {
        let (fill, shocked, expanded) = match role {
            StageRole::SecondaryDriver => ("statesd1", "statesd2", "statesd3"),
            StageRole::AccelerationTube => ("state5", "state6", "state7"),
            _ => ("state1", "state2", "state3"),
        };
        Self {
            fill: fill.into(),
            shocked: shocked.into(),
            expanded: expanded.into(),
            reflected: "state5".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TubeConfig {
    pub fill_gas: Gas,
    pub p_fill: Pressure,
    pub t_fill: Temperature,
    pub mode: TubeMode,
    pub guesses: ShockSpeedGuesses,
    /// Measured shock speed, required in experimental mode.
    pub shock_speed: Option<Velocity>,
    pub expand_to: ExpandTo,
    pub expansion_factor: f64,
    pub expansion_steps: usize,
    pub exit: TubeExit,
    pub length: Option<Length>,
    pub diameter: Option<Length>,
}

impl TubeConfig {
    pub fn validate(&self) -> ComponentResult<()> {
        if !(self.expansion_factor.is_finite() && self.expansion_factor > 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "expansion factor must be positive",
            });
        }
        if self.mode == TubeMode::Experimental {
            match self.shock_speed {
                None => return Err(ComponentError::MissingParameter { name: "shock_speed" }),
                Some(vs) if !(vs.value.is_finite() && vs.value > 0.0) => {
                    return Err(ComponentError::NonPhysical {
                        what: "shock speed must be strictly positive",
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Evaluated tube.
#[derive(Debug, Clone)]
pub struct Tube {
    role: StageRole,
    mode: TubeMode,
    exit: TubeExit,
    entrance: NamedState,
    fill: NamedState,
    shocked: NamedState,
    expanded: NamedState,
    reflected: Option<NamedState>,
    shock_speed: Velocity,
    shock_mach: f64,
    reflected_mach: Option<f64>,
    iterations: Option<usize>,
    length: Option<Length>,
    diameter: Option<Length>,
}

/// States behind the shock and in the expanded entrance gas for one shock speed.
struct ShockSolution {
    shocked: GasState,
    expanded: GasState,
}

impl Tube {
    pub fn evaluate(
        role: StageRole,
        config: TubeConfig,
        entrance: NamedState,
        model: &dyn GasModel,
        lookup: &dyn ReferenceLookup,
    ) -> ComponentResult<Self> {
        if role.kind() != StageKind::Tube {
            return Err(ComponentError::InvalidArg {
                what: "tube built for a non-tube role",
            });
        }
        config.validate()?;

        let names = TubeStateNames::for_role(role);
        let fill = model.state_from_pt(config.p_fill, config.t_fill, &config.fill_gas)?;
        let integrator = UnsteadyExpansionIntegrator::new(config.expansion_steps)?;

        let (vs, iterations) = match config.mode {
            TubeMode::Experimental => {
                let vs = config
                    .shock_speed
                    .ok_or(ComponentError::MissingParameter { name: "shock_speed" })?;
                (vs.value, None)
            }
            TubeMode::Theoretical => {
                let a1 = model.speed_of_sound(&fill).value;
                let solver = config
                    .guesses
                    .resolve(lookup)?
                    .with_lower_floor(a1 * MIN_SHOCK_MACH);
                let result = solver.solve(|vs| {
                    let jump = model.shock_jump(&fill, mps(vs))?;
                    let u_shocked = vs - jump.w2.value;
                    let target = match config.expand_to {
                        ExpandTo::FlowBehindShock => u_shocked,
                        ExpandTo::ShockSpeed => vs,
                    } * config.expansion_factor;
                    let expanded = integrator.expand(
                        model,
                        &entrance.state,
                        ExpansionTarget::Pressure(jump.state.pressure()),
                    )?;
                    Ok((expanded.velocity().value - target) / target)
                })?;
                (result.root, Some(result.iterations))
            }
        };

        if !(vs.is_finite() && vs > 0.0) {
            return Err(ComponentError::NonPhysical {
                what: "shock speed must be strictly positive",
            });
        }

        let solution = Self::solve_at(model, &integrator, &config, &fill, &entrance.state, vs)?;
        let a1 = model.speed_of_sound(&fill).value;
        debug!(
            role = %role,
            vs,
            ms = vs / a1,
            p_shocked = solution.shocked.pressure().value,
            "tube shock resolved"
        );

        let (reflected, reflected_mach) = if config.exit == TubeExit::Reflected {
            let shock = reflected_shock(model, &solution.shocked, ReflectedMach::Maximum)?;
            (
                Some(NamedState::new(names.reflected.clone(), shock.state)),
                Some(shock.mach),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            role,
            mode: config.mode,
            exit: config.exit,
            entrance,
            fill: NamedState::new(names.fill, fill),
            shocked: NamedState::new(names.shocked, solution.shocked),
            expanded: NamedState::new(names.expanded, solution.expanded),
            reflected,
            shock_speed: mps(vs),
            shock_mach: vs / a1,
            reflected_mach,
            iterations,
            length: config.length,
            diameter: config.diameter,
        })
    }

    fn solve_at(
        model: &dyn GasModel,
        integrator: &UnsteadyExpansionIntegrator,
        config: &TubeConfig,
        fill: &GasState,
        entrance: &GasState,
        vs: f64,
    ) -> ComponentResult<ShockSolution> {
        let jump = model.shock_jump(fill, mps(vs))?;
        let u_shocked = vs - jump.w2.value;
        let shocked = jump.state.with_velocity(mps(u_shocked));

        let target = match (config.mode, config.expand_to) {
            (TubeMode::Experimental, ExpandTo::ShockSpeed) => {
                ExpansionTarget::Velocity(mps(vs * config.expansion_factor))
            }
            _ => ExpansionTarget::Pressure(shocked.pressure()),
        };
        let expanded = integrator
            .expand(model, entrance, target)
            .map_err(|e| match e {
                SolverError::Gas(g) => ComponentError::Gas(g),
                other => ComponentError::Solver(other),
            })?;
        Ok(ShockSolution { shocked, expanded })
    }

    pub fn mode(&self) -> TubeMode {
        self.mode
    }

    pub fn fill_state(&self) -> &NamedState {
        &self.fill
    }

    pub fn shocked_state(&self) -> &NamedState {
        &self.shocked
    }

    pub fn expanded_state(&self) -> &NamedState {
        &self.expanded
    }

    pub fn reflected_state(&self) -> Option<&NamedState> {
        self.reflected.as_ref()
    }

    pub fn shock_mach(&self) -> f64 {
        self.shock_mach
    }

    /// Secant iterations used, `None` in experimental mode.
    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }
}

impl FacilityComponent for Tube {
    fn kind(&self) -> StageKind {
        StageKind::Tube
    }

    fn role(&self) -> StageRole {
        self.role
    }

    fn entrance_state(&self) -> &NamedState {
        &self.entrance
    }

    fn entrance_states(&self) -> Vec<&NamedState> {
        vec![&self.entrance, &self.fill]
    }

    fn exit_state(&self) -> &NamedState {
        match (self.exit, &self.reflected) {
            (TubeExit::ExpandedEntrance, _) => &self.expanded,
            (TubeExit::Reflected, Some(reflected)) => reflected,
            _ => &self.shocked,
        }
    }

    fn states(&self) -> Vec<&NamedState> {
        let mut states = vec![&self.fill, &self.shocked, &self.expanded];
        states.extend(self.reflected.as_ref());
        states
    }

    fn shock_speed(&self) -> Option<Velocity> {
        Some(self.shock_speed)
    }

    fn outputs(&self) -> Vec<StageOutput> {
        let mut out = vec![
            StageOutput::new("shock_speed", self.shock_speed.value, "m/s"),
            StageOutput::new("shock_mach", self.shock_mach, "-"),
        ];
        if let Some(mr) = self.reflected_mach {
            out.push(StageOutput::new("reflected_shock_mach", mr, "-"));
        }
        if let Some(n) = self.iterations {
            out.push(StageOutput::new("solver_iterations", n as f64, "-"));
        }
        if let Some(l) = self.length {
            out.push(StageOutput::new("length", l.value, "m"));
        }
        if let Some(d) = self.diameter {
            out.push(StageOutput::new("diameter", d.value, "m"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gp_core::units::{k, pa};
    use gp_gas::{PerfectGasModel, Species};
    use gp_solver::{GuessValue, SecantConfig};

    fn driver_state() -> NamedState {
        let state = PerfectGasModel
            .state_from_pt(pa(1.0e6), k(300.0), &Gas::pure(Species::Air))
            .unwrap();
        NamedState::new("state4", state)
    }

    fn config(mode: TubeMode, shock_speed: Option<f64>) -> TubeConfig {
        TubeConfig {
            fill_gas: Gas::pure(Species::Air),
            p_fill: pa(1.0e3),
            t_fill: k(300.0),
            mode,
            guesses: ShockSpeedGuesses {
                guess_1: GuessValue::Literal(800.0),
                guess_2: GuessValue::Literal(1200.0),
                lower_limit: GuessValue::Literal(400.0),
                upper_limit: GuessValue::Literal(10_000.0),
                config: SecantConfig::default(),
            },
            shock_speed: shock_speed.map(mps),
            expand_to: ExpandTo::FlowBehindShock,
            expansion_factor: 1.0,
            expansion_steps: 1000,
            exit: TubeExit::ShockedFill,
            length: None,
            diameter: None,
        }
    }

    #[test]
    fn theoretical_tube_matches_velocity_and_pressure() {
        let tube = Tube::evaluate(
            StageRole::ShockTube,
            config(TubeMode::Theoretical, None),
            driver_state(),
            &PerfectGasModel,
            &(),
        )
        .unwrap();
        let shocked = &tube.shocked_state().state;
        let expanded = &tube.expanded_state().state;
        assert!((shocked.pressure().value - expanded.pressure().value).abs() < 1e-6);
        let rel = (shocked.velocity().value - expanded.velocity().value).abs()
            / shocked.velocity().value;
        assert!(rel < 1e-5);
        assert_eq!(tube.exit_state().name, "state2");
        assert!(tube.shock_mach() > 1.0);
    }

    #[test]
    fn experimental_tube_uses_supplied_speed() {
        let tube = Tube::evaluate(
            StageRole::ShockTube,
            config(TubeMode::Experimental, Some(1100.0)),
            driver_state(),
            &PerfectGasModel,
            &(),
        )
        .unwrap();
        assert_eq!(tube.shock_speed().unwrap().value, 1100.0);
        assert_eq!(tube.iterations(), None);
    }

    #[test]
    fn experimental_tube_without_speed_fails() {
        let err = Tube::evaluate(
            StageRole::ShockTube,
            config(TubeMode::Experimental, None),
            driver_state(),
            &PerfectGasModel,
            &(),
        )
        .unwrap_err();
        assert!(matches!(err, ComponentError::MissingParameter { .. }));
    }

    #[test]
    fn subsonic_supplied_speed_is_non_physical() {
        let err = Tube::evaluate(
            StageRole::ShockTube,
            config(TubeMode::Experimental, Some(200.0)),
            driver_state(),
            &PerfectGasModel,
            &(),
        )
        .unwrap_err();
        assert!(matches!(err, ComponentError::Gas(_)));
    }

    #[test]
    fn reflected_exit_is_at_rest() {
        let mut cfg = config(TubeMode::Theoretical, None);
        cfg.exit = TubeExit::Reflected;
        let tube = Tube::evaluate(
            StageRole::ShockTube,
            cfg,
            driver_state(),
            &PerfectGasModel,
            &(),
        )
        .unwrap();
        let exit = tube.exit_state();
        assert_eq!(exit.name, "state5");
        assert_eq!(exit.state.velocity().value, 0.0);
        assert!(exit.state.pressure() > tube.shocked_state().state.pressure());
    }

    #[test]
    fn acceleration_tube_names() {
        let names = TubeStateNames::for_role(StageRole::AccelerationTube);
        assert_eq!(names.fill, "state5");
        assert_eq!(names.expanded, "state7");
    }
}
