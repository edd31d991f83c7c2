use std::path::{Path, PathBuf};

use gp_core::{StageRole, relative_difference as relative_error};
use gp_core::units::m;
use gp_path::{ErrorKind, FacilityType, GasPath, PathError, run_sweep};
use gp_project::{Condition, ProjectError};

fn config_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs")
        .join(name)
}

fn load(name: &str, overrides: &[&str]) -> Condition {
    let overrides: Vec<String> = overrides.iter().map(|s| s.to_string()).collect();
    Condition::load(Some(&config_path(name)), &overrides)
        .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e))
}

#[test]
fn shipped_conditions_evaluate() {
    for name in [
        "air_shock_tube.yaml",
        "expansion_tube_air.yaml",
        "reflected_shock_tunnel.yaml",
    ] {
        let condition = load(name, &[]);
        let config = condition
            .facility_config()
            .unwrap_or_else(|e| panic!("Failed to convert {}: {}", name, e));
        let model = condition.gas_model().expect("gas model");
        GasPath::evaluate(&config, model.as_ref())
            .unwrap_or_else(|e| panic!("Failed to evaluate {}: {}", name, e));
    }
}

#[test]
fn air_shock_tube_condition() {
    let condition = load("air_shock_tube.yaml", &[]);
    let config = condition.facility_config().expect("config");
    let model = condition.gas_model().expect("gas model");
    let path = GasPath::evaluate(&config, model.as_ref()).expect("evaluate");

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
    let vs1 = path.shock_speed(StageRole::ShockTube).expect("vs1").value;
    assert!(relative_error(vs1, 1093.92) < 1e-3, "vs1 = {vs1}");
    assert_eq!(config.driver.t_fill.value, 300.0);
}

#[test]
fn geometry_file_sets_flags_and_dimensions() {
    let condition = load("expansion_tube_air.yaml", &[]);
    let geometry = condition.geometry().expect("geometry");
    assert_eq!(geometry.name.as_deref(), Some("demo_expansion_tube"));

    let config = condition.facility_config().expect("config");
    assert_eq!(config.flags.facility_type, FacilityType::ExpansionTube);
    assert!(config.flags.secondary_driver);
    assert_eq!(config.nozzle.expect("nozzle").area_ratio, 2.5);
    assert_eq!(config.shock_tube.length, Some(m(3.418)));
    assert_eq!(
        config.acceleration_tube.as_ref().and_then(|t| t.diameter),
        Some(m(0.085))
    );

    let model = condition.gas_model().expect("gas model");
    let path = GasPath::evaluate(&config, model.as_ref()).expect("evaluate");
    assert_eq!(path.roles().len(), 9);
    let vs1 = path.shock_speed(StageRole::ShockTube).expect("vs1").value;
    let vs2 = path.shock_speed(StageRole::AccelerationTube).expect("vs2").value;
    assert!(relative_error(vs1, 2044.0) < 1e-2, "vs1 = {vs1}");
    assert!(relative_error(vs2, 4567.0) < 1e-2, "vs2 = {vs2}");
}

#[test]
fn overrides_beat_file_beat_defaults() {
    // Default 800, file 800, override 900.
    let condition = load("air_shock_tube.yaml", &["p1=2000", "vs1_guess_1=900"]);
    let params = condition.params();
    assert_eq!(params.require_f64("p1").expect("p1"), 2000.0);
    assert_eq!(params.require_f64("vs1_guess_1").expect("guess"), 900.0);
    // From the file, over a default of 20000.
    assert_eq!(
        params.get("vs1_limits").and_then(|v| v.as_sequence()).map(|s| s[1].as_f64()),
        Some(Some(10000.0))
    );
    // Untouched default.
    assert_eq!(params.require_f64("vs1_tolerance").expect("tol"), 1e-6);
}

#[test]
fn none_falls_back_to_geometric_area_ratio() {
    let condition = load("expansion_tube_air.yaml", &["area_ratio=4.0"]);
    assert_eq!(condition.facility_config().expect("config").nozzle.expect("nozzle").area_ratio, 4.0);

    let condition = load("expansion_tube_air.yaml", &["area_ratio=4.0", "area_ratio=None"]);
    assert_eq!(condition.facility_config().expect("config").nozzle.expect("nozzle").area_ratio, 2.5);

    let condition = load("expansion_tube_air.yaml", &["wedge_angle_degrees=None"]);
    let config = condition.facility_config().expect("config");
    assert_eq!(config.test_section.wedge_angle_degrees, None);
}

#[test]
fn missing_fill_pressure_is_configuration_error() {
    let condition = load("air_shock_tube.yaml", &["p1=None"]);
    let err = condition.facility_config().unwrap_err();
    assert!(matches!(err, ProjectError::Missing { ref key } if key == "p1"));

    let err: PathError = err.into();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn experimental_mode_needs_measured_speeds() {
    let condition = load("air_shock_tube.yaml", &["mode=fully_experimental"]);
    assert!(matches!(
        condition.facility_config(),
        Err(ProjectError::Missing { ref key }) if key == "vs1"
    ));

    let condition = load(
        "air_shock_tube.yaml",
        &["mode=fully_experimental", "vs1=1200", "vs1_limits=None"],
    );
    let config = condition.facility_config().expect("config");
    let model = condition.gas_model().expect("gas model");
    let path = GasPath::evaluate(&config, model.as_ref()).expect("evaluate");
    assert_eq!(path.shock_speed(StageRole::ShockTube).expect("vs1").value, 1200.0);
}

#[test]
fn reference_guesses_from_yaml() {
    let condition = load(
        "expansion_tube_air.yaml",
        &["vs2_guess_1={stage: acceleration_tube, offset: 10}"],
    );
    let config = condition.facility_config().expect("config");
    let model = condition.gas_model().expect("gas model");
    let err = GasPath::evaluate(&config, model.as_ref()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.stage(), Some(StageRole::AccelerationTube));
}

#[test]
fn unknown_facility_type_rejected() {
    let condition = load("air_shock_tube.yaml", &["facility_type=wind_tunnel"]);
    assert!(matches!(
        condition.facility_config(),
        Err(ProjectError::InvalidValue { .. })
    ));
}

#[test]
fn missing_condition_file_is_io_error() {
    let err = Condition::load(Some(&config_path("does_not_exist.yaml")), &[]).unwrap_err();
    assert!(matches!(err, ProjectError::Io(_)));
}

#[test]
fn topology_without_evaluation() {
    let topology = load("expansion_tube_air.yaml", &[]).topology().expect("topology");
    assert_eq!(topology.roles().first(), Some(&StageRole::Driver));
    assert_eq!(topology.roles().last(), Some(&StageRole::TestSection));
    assert!(topology.contains(StageRole::TertiaryDiaphragm));
}

#[test]
fn fill_pressure_sweep_from_condition() {
    let condition = load("air_shock_tube.yaml", &[]);
    let model = condition.gas_model().expect("gas model");
    let values = vec!["500".to_string(), "1000".to_string(), "-5".to_string()];

    let points = run_sweep(
        &values,
        |v| {
            condition
                .with_override("p1", v)
                .and_then(|c| c.facility_config())
                .map_err(PathError::from)
        },
        model.as_ref(),
    );

    assert_eq!(points.len(), 3);
    let vs: Vec<f64> = points[..2]
        .iter()
        .map(|p| {
            let path = p.result.as_ref().expect("sweep point");
            path.shock_speed(StageRole::ShockTube).expect("vs1").value
        })
        .collect();
    // Lower fill pressure, stronger shock.
    assert!(vs[0] > vs[1]);
    assert!(relative_error(vs[1], 1093.92) < 1e-3);
    assert!(points[2].result.is_err());
}
