//! Facility fixtures shared by the gas path tests.
#![allow(dead_code)]

use gp_components::{
    DiaphragmModel, DriverConfig, ExpandTo, NozzleConfig, RuptureCondition, TestSectionConfig,
    TubeConfig, TubeExit, TubeMode,
};
use gp_core::StageRole;
use gp_core::units::{k, pa};
use gp_gas::{Gas, Species};
use gp_path::{FacilityConfig, FacilityFlags, FacilityType, Mode};
use gp_solver::{GuessValue, SecantConfig, ShockSpeedGuesses, StageRef};

pub fn literal_guesses(g1: f64, g2: f64, lo: f64, hi: f64) -> ShockSpeedGuesses {
    ShockSpeedGuesses {
        guess_1: GuessValue::Literal(g1),
        guess_2: GuessValue::Literal(g2),
        lower_limit: GuessValue::Literal(lo),
        upper_limit: GuessValue::Literal(hi),
        config: SecantConfig::default(),
    }
}

/// Guesses for a tube placed after the shock tube.
pub fn after_shock_tube_guesses() -> ShockSpeedGuesses {
    ShockSpeedGuesses {
        guess_1: StageRef::shock_speed(StageRole::ShockTube, 1000.0).into(),
        guess_2: StageRef::shock_speed(StageRole::ShockTube, 2000.0).into(),
        lower_limit: StageRef::shock_speed(StageRole::ShockTube, 0.0).into(),
        upper_limit: GuessValue::Literal(20_000.0),
        config: SecantConfig::default(),
    }
}

pub fn tube(gas: Species, p: f64, guesses: ShockSpeedGuesses) -> TubeConfig {
    TubeConfig {
        fill_gas: Gas::pure(gas),
        p_fill: pa(p),
        t_fill: k(300.0),
        mode: TubeMode::Theoretical,
        guesses,
        shock_speed: None,
        expand_to: ExpandTo::FlowBehindShock,
        expansion_factor: 1.0,
        expansion_steps: 1000,
        exit: TubeExit::ShockedFill,
        length: None,
        diameter: None,
    }
}

/// Air driver at 1 MPa into air at 1 kPa, both at 300 K.
pub fn basic_shock_tube() -> FacilityConfig {
    FacilityConfig {
        flags: FacilityFlags {
            facility_type: FacilityType::ShockTube,
            secondary_driver: false,
            nozzle: false,
        },
        mode: Mode::FullyTheoretical,
        driver: DriverConfig {
            gas: Gas::pure(Species::Air),
            p_fill: pa(1.0e6),
            t_fill: k(300.0),
            rupture: RuptureCondition::Direct,
            m_throat: 0.0,
        },
        primary_diaphragm: DiaphragmModel::Ideal,
        secondary_driver: None,
        secondary_diaphragm: DiaphragmModel::Ideal,
        shock_tube: tube(Species::Air, 1.0e3, literal_guesses(800.0, 1200.0, 400.0, 10_000.0)),
        tertiary_diaphragm: DiaphragmModel::Ideal,
        acceleration_tube: None,
        nozzle: None,
        test_section: TestSectionConfig::default(),
    }
}

/// Helium-driven expansion tube; every optional stage configured.
pub fn expansion_tube(secondary_driver: bool, nozzle: bool) -> FacilityConfig {
    let mut config = basic_shock_tube();
    config.flags = FacilityFlags {
        facility_type: FacilityType::ExpansionTube,
        secondary_driver,
        nozzle,
    };
    config.driver.gas = Gas::pure(Species::He);
    config.driver.p_fill = pa(3.0e6);
    config.secondary_driver = Some(tube(
        Species::He,
        3.0e4,
        literal_guesses(1500.0, 2500.0, 500.0, 20_000.0),
    ));
    config.shock_tube = tube(Species::Air, 3.0e3, literal_guesses(800.0, 1200.0, 400.0, 20_000.0));
    config.acceleration_tube = Some(tube(Species::Air, 10.0, after_shock_tube_guesses()));
    config.nozzle = Some(NozzleConfig::new(2.5));
    config
}

/// Every flag combination with all stage configurations present.
pub fn config_for(flags: FacilityFlags) -> FacilityConfig {
    let mut config = expansion_tube(flags.secondary_driver, flags.nozzle);
    config.flags = flags;
    if flags.facility_type == FacilityType::ReflectedShockTunnel {
        config.nozzle = Some(NozzleConfig::new(10.0));
    }
    config
}

pub fn relative_error(a: f64, b: f64) -> f64 {
    gp_core::relative_difference(a, b)
}
