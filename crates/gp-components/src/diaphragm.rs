//! Diaphragm between two facility sections.

use crate::common::{ReflectedMach, reflected_shock};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{FacilityComponent, StageOutput};
use gp_core::units::mps;
use gp_core::{StageKind, StageRole};
use gp_gas::{GasModel, NamedState};

/// Non-ideal effects applied at a diaphragm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DiaphragmModel {
    /// Gas passes through unchanged.
    Ideal,
    /// Flow velocity is multiplied by `factor`.
    VelocityLoss { factor: f64 },
    /// A shock reflects off the diaphragm before it opens.
    ReflectedShock { mach: ReflectedMach },
    /// Reflected shock followed by a velocity loss.
    ReflectedShockVelocityLoss { mach: ReflectedMach, factor: f64 },
}

impl DiaphragmModel {
    /// Suffix appended to the entrance state name to form the exit name.
    pub fn state_suffix(&self) -> &'static str {
        match self {
            DiaphragmModel::Ideal => "",
            DiaphragmModel::VelocityLoss { .. } => "l",
            DiaphragmModel::ReflectedShock { .. } => "r",
            DiaphragmModel::ReflectedShockVelocityLoss { .. } => "rl",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiaphragmModel::Ideal => "ideal",
            DiaphragmModel::VelocityLoss { .. } => "velocity_loss_factor",
            DiaphragmModel::ReflectedShock { .. } => "reflected_shock",
            DiaphragmModel::ReflectedShockVelocityLoss { .. } => {
                "reflected_shock_and_velocity_loss_factor"
            }
        }
    }

    pub fn validate(&self) -> ComponentResult<()> {
        let factor = match self {
            DiaphragmModel::VelocityLoss { factor }
            | DiaphragmModel::ReflectedShockVelocityLoss { factor, .. } => Some(*factor),
            _ => None,
        };
        if let Some(f) = factor {
            if !(f.is_finite() && f > 0.0 && f <= 1.0) {
                return Err(ComponentError::InvalidArg {
                    what: "diaphragm velocity loss factor must be in (0, 1]",
                });
            }
        }
        if let DiaphragmModel::ReflectedShock {
            mach: ReflectedMach::Value(mr),
        }
        | DiaphragmModel::ReflectedShockVelocityLoss {
            mach: ReflectedMach::Value(mr),
            ..
        } = self
        {
            if !(mr.is_finite() && *mr > 1.0) {
                return Err(ComponentError::InvalidArg {
                    what: "diaphragm reflected shock Mach number must be greater than 1",
                });
            }
        }
        Ok(())
    }
}

/// Evaluated diaphragm.
#[derive(Debug, Clone)]
pub struct Diaphragm {
    role: StageRole,
    model: DiaphragmModel,
    entrance: NamedState,
    reflected: Option<NamedState>,
    exit: NamedState,
    reflected_mach: Option<f64>,
}

impl Diaphragm {
    pub fn evaluate(
        role: StageRole,
        diaphragm: DiaphragmModel,
        entrance: NamedState,
        model: &dyn GasModel,
    ) -> ComponentResult<Self> {
        if role.kind() != StageKind::Diaphragm {
            return Err(ComponentError::InvalidArg {
                what: "diaphragm built for a non-diaphragm role",
            });
        }
        diaphragm.validate()?;

        let mut reflected = None;
        let mut reflected_mach = None;
        let mut state = entrance.state.clone();

        if let DiaphragmModel::ReflectedShock { mach }
        | DiaphragmModel::ReflectedShockVelocityLoss { mach, .. } = diaphragm
        {
            let shock = reflected_shock(model, &state, mach)?;
            reflected_mach = Some(shock.mach);
            state = shock.state;
            reflected = Some(NamedState::new(format!("{}r", entrance.name), state.clone()));
        }

        if let DiaphragmModel::VelocityLoss { factor }
        | DiaphragmModel::ReflectedShockVelocityLoss { factor, .. } = diaphragm
        {
            state = state.with_velocity(mps(state.velocity().value * factor));
        }

        let exit = NamedState::new(
            format!("{}{}", entrance.name, diaphragm.state_suffix()),
            state,
        );

        Ok(Self {
            role,
            model: diaphragm,
            entrance,
            reflected,
            exit,
            reflected_mach,
        })
    }

    pub fn model(&self) -> &DiaphragmModel {
        &self.model
    }

    pub fn reflected_mach(&self) -> Option<f64> {
        self.reflected_mach
    }
}

impl FacilityComponent for Diaphragm {
    fn kind(&self) -> StageKind {
        StageKind::Diaphragm
    }

    fn role(&self) -> StageRole {
        self.role
    }

    fn entrance_state(&self) -> &NamedState {
        &self.entrance
    }

    fn exit_state(&self) -> &NamedState {
        &self.exit
    }

    fn states(&self) -> Vec<&NamedState> {
        let mut states = vec![&self.entrance];
        if let Some(r) = &self.reflected {
            if r.name != self.exit.name {
                states.push(r);
            }
        }
        if self.exit.name != self.entrance.name {
            states.push(&self.exit);
        }
        states
    }

    fn outputs(&self) -> Vec<StageOutput> {
        self.reflected_mach
            .map(|mr| vec![StageOutput::new("reflected_shock_mach", mr, "-")])
            .unwrap_or_default()
    }
}
