//! End-to-end facility evaluations.

mod common;

use common::*;
use gp_core::StageRole;
use gp_gas::PerfectGasModel;
use gp_path::{ErrorKind, FacilityType, GasPath, Mode};

fn assert_continuous(path: &GasPath) {
    for pair in path.stages().windows(2) {
        assert_eq!(
            pair[1].entrance_state(),
            pair[0].exit_state(),
            "break between {} and {}",
            pair[0].role(),
            pair[1].role()
        );
    }
}

#[test]
fn shock_tube_end_to_end() {
    let path = GasPath::evaluate(&basic_shock_tube(), &PerfectGasModel)
        .expect("shock tube evaluation failed");

    assert_eq!(
        path.roles(),
        vec![
            StageRole::Driver,
            StageRole::PrimaryDiaphragm,
            StageRole::ShockTube,
            StageRole::SecondaryDiaphragm,
            StageRole::TestSection,
        ]
    );
    assert_continuous(&path);

    let vs1 = path.shock_speed(StageRole::ShockTube).unwrap().value;
    assert!(vs1 > 0.0);
    assert!(relative_error(vs1, 1093.92) < 1e-3, "vs1 = {vs1}");

    let shocked = path.state("state2").unwrap();
    let test = path.exit_state().unwrap();
    assert_eq!(test.name, "state10f");
    assert!(test.state.pressure() > shocked.state.pressure());
    assert!(path.state("state4").is_some());
    assert!(path.state("state3").is_some());
}

#[test]
fn expansion_tube_with_every_stage() {
    let path = GasPath::evaluate(&expansion_tube(true, true), &PerfectGasModel)
        .expect("expansion tube evaluation failed");
    assert_eq!(path.stages().len(), 9);
    assert_continuous(&path);

    let vsd = path.shock_speed(StageRole::SecondaryDriver).unwrap().value;
    let vs1 = path.shock_speed(StageRole::ShockTube).unwrap().value;
    let vs2 = path.shock_speed(StageRole::AccelerationTube).unwrap().value;
    assert!(relative_error(vsd, 2236.6) < 1e-3, "vsd = {vsd}");
    assert!(relative_error(vs1, 2044.0) < 1e-3, "vs1 = {vs1}");
    assert!(relative_error(vs2, 4567.0) < 2e-3, "vs2 = {vs2}");

    let nozzle = path.stage(StageRole::Nozzle).unwrap();
    assert_eq!(nozzle.exit_state().name, "state8");
    assert!(nozzle.exit_state().state.mach_number() > nozzle.entrance_state().state.mach_number());
}

#[test]
fn expansion_tube_without_secondary_driver() {
    let path = GasPath::evaluate(&expansion_tube(false, false), &PerfectGasModel)
        .expect("expansion tube evaluation failed");
    assert_continuous(&path);
    let vs1 = path.shock_speed(StageRole::ShockTube).unwrap().value;
    let vs2 = path.shock_speed(StageRole::AccelerationTube).unwrap().value;
    assert!(relative_error(vs1, 1870.9) < 1e-3, "vs1 = {vs1}");
    assert!(relative_error(vs2, 4198.0) < 2e-3, "vs2 = {vs2}");
    assert_eq!(
        path.stage(StageRole::AccelerationTube).unwrap().exit_state().name,
        "state7"
    );
}

#[test]
fn reflected_shock_tunnel_stagnates_before_nozzle() {
    let mut config = basic_shock_tube();
    config.flags.facility_type = FacilityType::ReflectedShockTunnel;
    config.flags.nozzle = true;
    config.nozzle = Some(gp_components::NozzleConfig::new(10.0));
    let path = GasPath::evaluate(&config, &PerfectGasModel).expect("reflected shock tunnel failed");
    assert_continuous(&path);

    let st = path.stage(StageRole::ShockTube).unwrap();
    assert_eq!(st.exit_state().name, "state5");
    assert_eq!(st.exit_state().state.velocity().value, 0.0);
    let nozzle = path.stage(StageRole::Nozzle).unwrap();
    assert!(nozzle.exit_state().state.mach_number() > 3.0);
}

#[test]
fn experimental_mode_ignores_guesses() {
    let mut config = basic_shock_tube();
    config.mode = Mode::FullyExperimental;
    config.shock_tube.shock_speed = Some(gp_core::units::mps(1100.0));
    let reference = GasPath::evaluate(&config, &PerfectGasModel).expect("experimental run failed");

    // Limits that could never bracket a root, and a forward reference.
    config.shock_tube.guesses = literal_guesses(1.0, 2.0, 50.0, 10.0);
    config.shock_tube.guesses.guess_1 =
        gp_solver::StageRef::shock_speed(StageRole::ShockTube, 0.0).into();
    let bypassed = GasPath::evaluate(&config, &PerfectGasModel).expect("experimental run failed");

    assert_eq!(
        bypassed.shock_speed(StageRole::ShockTube).unwrap().value,
        1100.0
    );
    assert_eq!(bypassed.exit_state(), reference.exit_state());
}

#[test]
fn experimental_mode_needs_supplied_speed() {
    let mut config = basic_shock_tube();
    config.mode = Mode::FullyExperimental;
    let err = GasPath::evaluate(&config, &PerfectGasModel).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.stage(), Some(StageRole::ShockTube));
}

#[test]
fn inverted_limits_are_a_convergence_error() {
    let mut config = basic_shock_tube();
    config.shock_tube.guesses = literal_guesses(800.0, 1200.0, 5000.0, 4000.0);
    let err = GasPath::evaluate(&config, &PerfectGasModel).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convergence);
    assert_eq!(err.stage(), Some(StageRole::ShockTube));
}

#[test]
fn root_outside_limits_is_a_convergence_error() {
    let mut config = basic_shock_tube();
    config.shock_tube.guesses = literal_guesses(2000.0, 2500.0, 1500.0, 3000.0);
    let err = GasPath::evaluate(&config, &PerfectGasModel).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convergence);
}

#[test]
fn reflected_shock_tunnel_without_nozzle_is_a_configuration_error() {
    let mut config = basic_shock_tube();
    config.flags.facility_type = FacilityType::ReflectedShockTunnel;
    let err = config.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.stage(), Some(StageRole::Nozzle));

    let err = GasPath::evaluate(&config, &PerfectGasModel).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn missing_acceleration_tube_is_a_configuration_error() {
    let mut config = expansion_tube(false, false);
    config.acceleration_tube = None;
    let err = GasPath::evaluate(&config, &PerfectGasModel).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.stage(), Some(StageRole::AccelerationTube));
}

#[test]
fn wedge_and_cone_in_test_section() {
    let mut config = expansion_tube(false, true);
    config.test_section.wedge_angle_degrees = Some(10.0);
    config.test_section.cone_half_angle_degrees = Some(10.0);
    let path = GasPath::evaluate(&config, &PerfectGasModel).expect("evaluation failed");
    assert!(path.state("state10w").is_some());
    assert!(path.state("state10c").is_some());
    let outputs = path.stage(StageRole::TestSection).unwrap().outputs();
    assert!(outputs.iter().any(|o| o.name == "pitot_pressure"));
}
