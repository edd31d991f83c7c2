//! Driver: the high-pressure section whose rupture starts the flow.

use crate::common::steady_expand_to_mach;
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{FacilityComponent, StageOutput};
use gp_core::units::{Pressure, Temperature, pa};
use gp_core::{StageKind, StageRole};
use gp_gas::{Gas, GasModel, NamedState};
use tracing::debug;

/// How the driver gets from its fill state to its rupture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuptureCondition {
    /// The fill state is the rupture state.
    Direct,
    /// Isentropic compression to a rupture pressure.
    RupturePressure(Pressure),
    /// Isentropic compression by a volumetric compression ratio.
    CompressionRatio(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub gas: Gas,
    pub p_fill: Pressure,
    pub t_fill: Temperature,
    pub rupture: RuptureCondition,
    /// Mach number at an area change between driver and primary diaphragm.
    /// Zero means no throat.
    pub m_throat: f64,
}

impl DriverConfig {
    pub fn validate(&self) -> ComponentResult<()> {
        match self.rupture {
            RuptureCondition::Direct => {}
            RuptureCondition::RupturePressure(p) => {
                if !(p.value.is_finite() && p.value > 0.0) {
                    return Err(ComponentError::InvalidArg {
                        what: "driver rupture pressure must be positive",
                    });
                }
            }
            RuptureCondition::CompressionRatio(lambda) => {
                if !(lambda.is_finite() && lambda >= 1.0) {
                    return Err(ComponentError::InvalidArg {
                        what: "driver compression ratio must be at least 1",
                    });
                }
            }
        }
        if !(self.m_throat.is_finite() && self.m_throat >= 0.0) {
            return Err(ComponentError::InvalidArg {
                what: "driver throat Mach number must be non-negative",
            });
        }
        Ok(())
    }
}

/// Evaluated driver section.
#[derive(Debug, Clone)]
pub struct Driver {
    config: DriverConfig,
    fill: NamedState,
    rupture: NamedState,
    throat: Option<NamedState>,
}

impl Driver {
    pub const FILL_STATE: &'static str = "state4i";
    pub const RUPTURE_STATE: &'static str = "state4";
    pub const THROAT_STATE: &'static str = "state3s";

    pub fn evaluate(config: DriverConfig, model: &dyn GasModel) -> ComponentResult<Self> {
        config.validate()?;

        let fill = model.state_from_pt(config.p_fill, config.t_fill, &config.gas)?;
        let rupture = match config.rupture {
            RuptureCondition::Direct => fill.clone(),
            RuptureCondition::RupturePressure(p) => model.isentropic_to_pressure(&fill, p)?,
            RuptureCondition::CompressionRatio(lambda) => {
                let gamma = model.gamma_and_r(&fill).0;
                let p4 = fill.pressure().value * lambda.powf(gamma);
                model.isentropic_to_pressure(&fill, pa(p4))?
            }
        };
        debug!(
            p4 = rupture.pressure().value,
            t4 = rupture.temperature().value,
            "driver rupture state"
        );

        let throat = if config.m_throat > 0.0 {
            let state = steady_expand_to_mach(model, &rupture, config.m_throat)?;
            Some(NamedState::new(Self::THROAT_STATE, state))
        } else {
            None
        };

        Ok(Self {
            config,
            fill: NamedState::new(Self::FILL_STATE, fill),
            rupture: NamedState::new(Self::RUPTURE_STATE, rupture),
            throat,
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn rupture_state(&self) -> &NamedState {
        &self.rupture
    }

    pub fn throat_state(&self) -> Option<&NamedState> {
        self.throat.as_ref()
    }
}

impl FacilityComponent for Driver {
    fn kind(&self) -> StageKind {
        StageKind::Driver
    }

    fn role(&self) -> StageRole {
        StageRole::Driver
    }

    fn entrance_state(&self) -> &NamedState {
        &self.fill
    }

    fn exit_state(&self) -> &NamedState {
        self.throat.as_ref().unwrap_or(&self.rupture)
    }

    fn states(&self) -> Vec<&NamedState> {
        let mut states = vec![&self.fill, &self.rupture];
        states.extend(self.throat.as_ref());
        states
    }

    fn outputs(&self) -> Vec<StageOutput> {
        let p_ratio = self.rupture.state.pressure().value / self.fill.state.pressure().value;
        let mut out = vec![StageOutput::new("rupture_pressure_ratio", p_ratio, "-")];
        if self.config.m_throat > 0.0 {
            out.push(StageOutput::new("throat_mach", self.config.m_throat, "-"));
        }
        out
    }
}
