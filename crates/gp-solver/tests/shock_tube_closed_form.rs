//! Secant solver + unsteady expansion against the ideal shock tube relation.

use gp_core::units::{k, mps, pa};
use gp_gas::{Gas, GasModel, GasState, PerfectGasModel, Species};
use gp_solver::{
    ExpansionTarget, SecantConfig, ShockSpeedSolver, SolverResult, UnsteadyExpansionIntegrator,
};

/// p4/p1 as a function of shock Mach number for a shock tube.
fn p4_over_p1(ms: f64, g1: f64, g4: f64, a1_over_a4: f64) -> f64 {
    let p21 = 1.0 + 2.0 * g1 / (g1 + 1.0) * (ms * ms - 1.0);
    let term = (g4 - 1.0) * a1_over_a4 * (p21 - 1.0)
        / (2.0 * g1 * (2.0 * g1 + (g1 + 1.0) * (p21 - 1.0))).sqrt();
    p21 * (1.0 - term).powf(-2.0 * g4 / (g4 - 1.0))
}

fn closed_form_mach(ratio: f64, g1: f64, g4: f64, a1_over_a4: f64) -> f64 {
    let (mut lo, mut hi) = (1.0001, 10.0);
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if p4_over_p1(mid, g1, g4, a1_over_a4) < ratio {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

fn residual(
    model: &PerfectGasModel,
    fill: &GasState,
    driver: &GasState,
    vs: f64,
) -> SolverResult<f64> {
    let jump = model.shock_jump(fill, mps(vs))?;
    let u2 = vs - jump.w2.value;
    let expanded = UnsteadyExpansionIntegrator::default().expand(
        model,
        driver,
        ExpansionTarget::Pressure(jump.state.pressure()),
    )?;
    Ok((expanded.velocity().value - u2) / u2)
}

#[test]
fn air_air_pressure_ratio_1000() {
    let model = PerfectGasModel;
    let air = Gas::pure(Species::Air);
    let driver = model.state_from_pt(pa(1.0e6), k(300.0), &air).unwrap();
    let fill = model.state_from_pt(pa(1.0e3), k(300.0), &air).unwrap();

    let solver = ShockSpeedSolver::new((800.0, 1200.0), (400.0, 10_000.0), SecantConfig::default());
    let result = solver
        .solve(|vs| residual(&model, &fill, &driver, vs))
        .unwrap();

    let a1 = fill.sound_speed().value;
    let ms = closed_form_mach(1000.0, fill.gamma(), driver.gamma(), 1.0);
    let expected = ms * a1;
    let rel = (result.root - expected).abs() / expected;
    assert!(rel < 1.0e-3, "vs = {}, expected {expected}", result.root);
}

#[test]
fn helium_driver_is_faster_than_air_driver() {
    let model = PerfectGasModel;
    let air = Gas::pure(Species::Air);
    let fill = model.state_from_pt(pa(1.0e3), k(300.0), &air).unwrap();
    let solver = ShockSpeedSolver::new((1000.0, 1500.0), (400.0, 10_000.0), SecantConfig::default());

    let mut speeds = Vec::new();
    for species in [Species::Air, Species::He] {
        let driver = model
            .state_from_pt(pa(1.0e6), k(300.0), &Gas::pure(species))
            .unwrap();
        let result = solver
            .solve(|vs| residual(&model, &fill, &driver, vs))
            .unwrap();
        speeds.push(result.root);
    }
    assert!(speeds[1] > speeds[0]);

    let he = model
        .state_from_pt(pa(1.0e6), k(300.0), &Gas::pure(Species::He))
        .unwrap();
    let ms = closed_form_mach(
        1000.0,
        fill.gamma(),
        he.gamma(),
        fill.sound_speed().value / he.sound_speed().value,
    );
    let expected = ms * fill.sound_speed().value;
    assert!((speeds[1] - expected).abs() / expected < 1.0e-3);
}
