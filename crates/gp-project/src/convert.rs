//! Flat parameters to typed facility configuration.

use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::geometry::FacilityGeometry;
use crate::params::{Params, value_to_f64};
use crate::{ProjectError, ProjectResult};
use gp_components::{
    DiaphragmModel, DriverConfig, ExpandTo, NozzleConfig, ReflectedMach, RuptureCondition,
    TestSectionConfig, TubeConfig, TubeExit, TubeMode,
};
use gp_core::units::{k, m, mps, pa};
use gp_core::{StageField, StageRole};
use gp_gas::{Composition, Gas, GasModel, PerfectGasModel, Species};
use gp_path::{FacilityConfig, FacilityFlags, FacilityType, Mode};
use gp_solver::{GuessValue, SecantConfig, ShockSpeedGuesses, StageRef};

const TEMPERATURE_ALIASES: &[&str] = &["T_0"];
const PRESSURE_ALIASES: &[&str] = &["p_0"];

/// Parameter names of one tube.
struct TubeKeys {
    role: StageRole,
    gas: &'static str,
    p_fill: &'static str,
    t_fill: &'static str,
    /// Prefix of the shock speed parameters (`vs1`, `vs1_guess_1`, ...).
    speed: &'static str,
}

const SECONDARY_DRIVER: TubeKeys = TubeKeys {
    role: StageRole::SecondaryDriver,
    gas: "secondary_driver_gas",
    p_fill: "psd1",
    t_fill: "Tsd1",
    speed: "vsd",
};

const SHOCK_TUBE: TubeKeys = TubeKeys {
    role: StageRole::ShockTube,
    gas: "test_gas",
    p_fill: "p1",
    t_fill: "T1",
    speed: "vs1",
};

const ACCELERATION_TUBE: TubeKeys = TubeKeys {
    role: StageRole::AccelerationTube,
    gas: "accelerator_gas",
    p_fill: "p5",
    t_fill: "T5",
    speed: "vs2",
};

/// Build the typed configuration from merged parameters.
pub fn facility_config(
    params: &Params,
    geometry: Option<&FacilityGeometry>,
) -> ProjectResult<FacilityConfig> {
    let mode = params
        .require_str("mode")?
        .parse::<Mode>()
        .map_err(|e| ProjectError::invalid("mode", e.to_string()))?;
    let flags = flags(params, geometry)?;
    debug!(
        facility = %flags.facility_type,
        secondary_driver = flags.secondary_driver,
        nozzle = flags.nozzle,
        %mode,
        "converting condition"
    );

    let secondary_driver = if flags.secondary_driver {
        Some(tube(params, &SECONDARY_DRIVER, mode, geometry)?)
    } else {
        None
    };
    let acceleration_tube = if flags.facility_type == FacilityType::ExpansionTube {
        Some(tube(params, &ACCELERATION_TUBE, mode, geometry)?)
    } else {
        None
    };
    let nozzle = if flags.nozzle {
        Some(nozzle(params, geometry)?)
    } else {
        None
    };

    let config = FacilityConfig {
        flags,
        mode,
        driver: driver(params)?,
        primary_diaphragm: diaphragm(params, "primary_diaphragm")?,
        secondary_driver,
        secondary_diaphragm: diaphragm(params, "secondary_diaphragm")?,
        shock_tube: tube(params, &SHOCK_TUBE, mode, geometry)?,
        tertiary_diaphragm: diaphragm(params, "tertiary_diaphragm")?,
        acceleration_tube,
        nozzle,
        test_section: TestSectionConfig {
            wedge_angle_degrees: params.f64("wedge_angle_degrees")?,
            cone_half_angle_degrees: params.f64("cone_half_angle_degrees")?,
        },
    };
    config.validate()?;
    Ok(config)
}

/// The gas model a condition asks for.
pub fn gas_model(params: &Params) -> ProjectResult<Box<dyn GasModel>> {
    match params.require_str("gas_model")? {
        "perfect_gas" => Ok(Box::new(PerfectGasModel::new())),
        other => Err(ProjectError::invalid(
            "gas_model",
            format!("unsupported gas model '{other}'"),
        )),
    }
}

fn flags(params: &Params, geometry: Option<&FacilityGeometry>) -> ProjectResult<FacilityFlags> {
    if let Some(g) = geometry {
        return g.flags();
    }
    let facility_type = params
        .require_str("facility_type")?
        .parse::<FacilityType>()
        .map_err(|e| ProjectError::invalid("facility_type", e.to_string()))?;
    Ok(FacilityFlags {
        facility_type,
        secondary_driver: params.bool("secondary_driver")?.unwrap_or(false),
        nozzle: params.bool("nozzle")?.unwrap_or(false),
    })
}

fn temperature(params: &Params, key: &str) -> ProjectResult<f64> {
    params
        .f64_or_alias(key, TEMPERATURE_ALIASES)?
        .ok_or_else(|| ProjectError::missing(key))
}

fn pressure(params: &Params, key: &str) -> ProjectResult<f64> {
    params
        .f64_or_alias(key, PRESSURE_ALIASES)?
        .ok_or_else(|| ProjectError::missing(key))
}

/// Gas selected by `<prefix>_gamma`/`<prefix>_R`, `<prefix>_composition` or
/// `<prefix>_name`, in that order.
fn gas(params: &Params, prefix: &str) -> ProjectResult<Gas> {
    let name_key = format!("{prefix}_name");
    let name = params.str(&name_key)?;

    let gamma = params.f64(&format!("{prefix}_gamma"))?;
    let r = params.f64(&format!("{prefix}_R"))?;
    match (gamma, r) {
        (Some(gamma), Some(r)) => {
            return Ok(Gas::custom(name.unwrap_or(prefix), gamma, r)?);
        }
        (None, None) => {}
        _ => {
            return Err(ProjectError::invalid(
                prefix,
                "a custom gas needs both gamma and R",
            ));
        }
    }

    let composition_key = format!("{prefix}_composition");
    if let Some(value) = params.get(&composition_key) {
        let mapping = value
            .as_mapping()
            .ok_or_else(|| ProjectError::invalid(&composition_key, "expected species: fraction"))?;
        let mut fractions = Vec::with_capacity(mapping.len());
        for (species, fraction) in mapping {
            let species = species
                .as_str()
                .ok_or_else(|| ProjectError::invalid(&composition_key, "species names must be strings"))?;
            fractions.push((
                Species::from_name(species)?,
                value_to_f64(&composition_key, fraction)?,
            ));
        }
        let composition = Composition::new_mole_fractions(fractions)?;
        return Ok(Gas::mixture(name.unwrap_or(prefix), composition));
    }

    let name = name.ok_or_else(|| ProjectError::missing(name_key))?;
    Ok(Gas::pure(Species::from_name(name)?))
}

fn driver(params: &Params) -> ProjectResult<DriverConfig> {
    let rupture = match params.require_str("driver_rupture_condition")? {
        "direct" => RuptureCondition::Direct,
        "rupture_pressure" => RuptureCondition::RupturePressure(pa(params.require_f64("p4")?)),
        "compression_ratio" => {
            RuptureCondition::CompressionRatio(params.require_f64("driver_compression_ratio")?)
        }
        other => {
            return Err(ProjectError::invalid(
                "driver_rupture_condition",
                format!("unknown rupture condition '{other}'"),
            ));
        }
    };
    // A direct rupture may give its single state as p4.
    let p_fill = match (params.f64_or_alias("p4i", PRESSURE_ALIASES)?, rupture) {
        (Some(p), _) => p,
        (None, RuptureCondition::Direct) => pressure(params, "p4")?,
        (None, _) => return Err(ProjectError::missing("p4i")),
    };
    Ok(DriverConfig {
        gas: gas(params, "driver_gas")?,
        p_fill: pa(p_fill),
        t_fill: k(temperature(params, "T4i")?),
        rupture,
        m_throat: params.f64("M_throat")?.unwrap_or(0.0),
    })
}

fn diaphragm(params: &Params, name: &str) -> ProjectResult<DiaphragmModel> {
    let type_key = format!("{name}_diaphragm_type");
    let kind = params.str(&type_key)?.unwrap_or("ideal");

    let mach = || -> ProjectResult<ReflectedMach> {
        let key = format!("{name}_Mr");
        match params.get(&key) {
            None => Ok(ReflectedMach::Maximum),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("maximum") => {
                Ok(ReflectedMach::Maximum)
            }
            Some(v) => Ok(ReflectedMach::Value(value_to_f64(&key, v)?)),
        }
    };
    let factor = || -> ProjectResult<f64> {
        params.require_f64(&format!("{name}_velocity_loss_factor"))
    };

    let model = match kind {
        "ideal" => DiaphragmModel::Ideal,
        "velocity_loss_factor" => DiaphragmModel::VelocityLoss { factor: factor()? },
        "reflected_shock" => DiaphragmModel::ReflectedShock { mach: mach()? },
        "reflected_shock_and_velocity_loss_factor" => DiaphragmModel::ReflectedShockVelocityLoss {
            mach: mach()?,
            factor: factor()?,
        },
        other => {
            return Err(ProjectError::invalid(
                type_key,
                format!("unknown diaphragm type '{other}'"),
            ));
        }
    };
    Ok(model)
}

fn tube(
    params: &Params,
    keys: &TubeKeys,
    mode: Mode,
    geometry: Option<&FacilityGeometry>,
) -> ProjectResult<TubeConfig> {
    let prefix = keys.role.as_str();
    let tube_mode = mode.for_role(keys.role);

    let shock_speed = params.f64(keys.speed)?;
    if tube_mode == TubeMode::Experimental && shock_speed.is_none() {
        return Err(ProjectError::missing(keys.speed));
    }

    let expand_to_key = format!("{prefix}_expand_to");
    let expand_to = match params.str(&expand_to_key)?.unwrap_or("flow_behind_shock") {
        "flow_behind_shock" => ExpandTo::FlowBehindShock,
        "shock_speed" => ExpandTo::ShockSpeed,
        other => {
            return Err(ProjectError::invalid(
                expand_to_key,
                format!("expected flow_behind_shock or shock_speed, got '{other}'"),
            ));
        }
    };

    let tube_geometry = geometry.and_then(|g| g.tube(keys.role)).copied();
    if geometry.is_some() && tube_geometry.is_none() {
        warn!(tube = %keys.role, "facility geometry has no entry for this tube");
    }
    let tube_geometry = tube_geometry.unwrap_or_default();

    Ok(TubeConfig {
        fill_gas: gas(params, keys.gas)?,
        p_fill: pa(pressure(params, keys.p_fill)?),
        t_fill: k(temperature(params, keys.t_fill)?),
        mode: tube_mode,
        guesses: guesses(params, keys.speed, tube_mode)?,
        shock_speed: shock_speed.map(mps),
        expand_to,
        expansion_factor: params
            .f64(&format!("{prefix}_expansion_factor"))?
            .unwrap_or(1.0),
        expansion_steps: params
            .usize(&format!("{prefix}_unsteady_expansion_steps"))?
            .unwrap_or(gp_solver::DEFAULT_EXPANSION_STEPS),
        // Placed by the gas path from the facility topology.
        exit: TubeExit::ShockedFill,
        length: tube_geometry.length.map(m),
        diameter: tube_geometry.diameter.map(m),
    })
}

fn guesses(params: &Params, speed: &str, mode: TubeMode) -> ProjectResult<ShockSpeedGuesses> {
    // An experimental tube never runs its solver.
    let required = mode == TubeMode::Theoretical;
    let value = |key: String| -> ProjectResult<GuessValue> {
        match params.get(&key) {
            Some(v) => parse_guess(&key, v),
            None if required => Err(ProjectError::missing(key)),
            None => Ok(GuessValue::Literal(0.0)),
        }
    };

    let limits_key = format!("{speed}_limits");
    let (lower_limit, upper_limit) = match params.get(&limits_key) {
        Some(Value::Sequence(seq)) if seq.len() == 2 => (
            parse_guess(&limits_key, &seq[0])?,
            parse_guess(&limits_key, &seq[1])?,
        ),
        Some(_) => {
            return Err(ProjectError::invalid(limits_key, "expected [lower, upper]"));
        }
        None if required => return Err(ProjectError::missing(limits_key)),
        None => (GuessValue::Literal(0.0), GuessValue::Literal(0.0)),
    };

    let defaults = SecantConfig::default();
    Ok(ShockSpeedGuesses {
        guess_1: value(format!("{speed}_guess_1"))?,
        guess_2: value(format!("{speed}_guess_2"))?,
        lower_limit,
        upper_limit,
        config: SecantConfig {
            tolerance: params
                .f64(&format!("{speed}_tolerance"))?
                .unwrap_or(defaults.tolerance),
            max_iterations: params
                .usize(&format!("{speed}_max_iterations"))?
                .unwrap_or(defaults.max_iterations),
        },
    })
}

fn shock_speed_field() -> StageField {
    StageField::ShockSpeed
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ReferenceEntry {
    stage: StageRole,
    #[serde(default = "shock_speed_field")]
    field: StageField,
    #[serde(default)]
    offset: f64,
}

/// A solver guess or limit: a number, or a reference to an earlier stage
/// written as `{stage: shock_tube, field: shock_speed, offset: 200.0}`.
/// `field` defaults to `shock_speed` and `offset` to zero.
pub fn parse_guess(key: &str, value: &Value) -> ProjectResult<GuessValue> {
    if let Value::Mapping(_) = value {
        let entry: ReferenceEntry = serde_yaml::from_value(value.clone())
            .map_err(|e| ProjectError::invalid(key, e.to_string()))?;
        if !entry.offset.is_finite() {
            return Err(ProjectError::invalid(key, "reference offset must be finite"));
        }
        return Ok(GuessValue::Reference(StageRef {
            stage: entry.stage,
            field: entry.field,
            offset: entry.offset,
        }));
    }
    Ok(GuessValue::Literal(value_to_f64(key, value)?))
}

fn nozzle(params: &Params, geometry: Option<&FacilityGeometry>) -> ProjectResult<NozzleConfig> {
    let area_ratio = match params.f64("area_ratio")? {
        Some(ar) => ar,
        None => {
            let ar = geometry
                .and_then(|g| g.nozzle_geometric_area_ratio)
                .ok_or_else(|| ProjectError::missing("area_ratio"))?;
            debug!(area_ratio = ar, "using the facility's geometric nozzle area ratio");
            ar
        }
    };
    let mut config = NozzleConfig::new(area_ratio);
    if let Some(tol) = params.f64("nozzle_expansion_tolerance")? {
        config.tolerance = tol;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{defaults, merge, parse_layer};

    fn params(yaml: &str) -> Params {
        Params::new(merge([defaults().unwrap(), parse_layer(yaml).unwrap()]))
    }

    #[test]
    fn literal_and_reference_guesses() {
        let v: Value = serde_yaml::from_str("1500.0").unwrap();
        assert_eq!(parse_guess("g", &v).unwrap(), GuessValue::Literal(1500.0));

        let v: Value = serde_yaml::from_str("{stage: shock_tube, offset: 200}").unwrap();
        assert_eq!(
            parse_guess("g", &v).unwrap(),
            GuessValue::Reference(StageRef::shock_speed(StageRole::ShockTube, 200.0))
        );
    }

    #[test]
    fn malformed_references_rejected() {
        for yaml in [
            "{stage: nozzle_throat}",
            "{stage: shock_tube, field: pressure}",
            "{stage: shock_tube, scale: 2.0}",
            "{offset: 5.0}",
        ] {
            let v: Value = serde_yaml::from_str(yaml).unwrap();
            assert!(parse_guess("g", &v).is_err(), "{yaml} accepted");
        }
    }

    #[test]
    fn gas_selection_order() {
        let p = params("test_gas_name: n2\n");
        assert_eq!(gas(&p, "test_gas").unwrap(), Gas::pure(Species::N2));

        let p = params("test_gas_name: synthetic\ntest_gas_composition: {n2: 0.79, o2: 0.21}\n");
        let g = gas(&p, "test_gas").unwrap();
        assert_eq!(g.name(), "synthetic");

        let p = params("test_gas_gamma: 1.3\ntest_gas_R: 300.0\n");
        assert!(gas(&p, "test_gas").is_ok());

        let p = params("test_gas_gamma: 1.3\n");
        assert!(gas(&p, "test_gas").is_err());
    }

    #[test]
    fn diaphragm_types() {
        let p = params(
            "secondary_diaphragm_diaphragm_type: reflected_shock_and_velocity_loss_factor\n\
             secondary_diaphragm_Mr: 2.5\n\
             secondary_diaphragm_velocity_loss_factor: 0.9\n",
        );
        assert_eq!(
            diaphragm(&p, "secondary_diaphragm").unwrap(),
            DiaphragmModel::ReflectedShockVelocityLoss {
                mach: ReflectedMach::Value(2.5),
                factor: 0.9
            }
        );

        let p = params("tertiary_diaphragm_diaphragm_type: reflected_shock\n");
        assert_eq!(
            diaphragm(&p, "tertiary_diaphragm").unwrap(),
            DiaphragmModel::ReflectedShock {
                mach: ReflectedMach::Maximum
            }
        );

        let p = params("primary_diaphragm_diaphragm_type: burst\n");
        assert!(diaphragm(&p, "primary_diaphragm").is_err());
    }

    #[test]
    fn driver_rupture_options() {
        let p = params("p4: 2.0e6\n");
        let d = driver(&p).unwrap();
        assert_eq!(d.rupture, RuptureCondition::Direct);
        assert_eq!(d.p_fill.value, 2.0e6);

        let p = params("driver_rupture_condition: compression_ratio\np4i: 1.0e5\ndriver_compression_ratio: 40.0\n");
        assert_eq!(driver(&p).unwrap().rupture, RuptureCondition::CompressionRatio(40.0));

        let p = params("driver_rupture_condition: rupture_pressure\np4: 2.0e6\n");
        assert!(matches!(driver(&p), Err(ProjectError::Missing { .. })));
    }

    #[test]
    fn experimental_tube_needs_speed_not_guesses() {
        let p = params("vs1_guess_1: None\nvs1_limits: None\np1: 1000.0\n");
        assert!(matches!(
            tube(&p, &SHOCK_TUBE, Mode::FullyTheoretical, None),
            Err(ProjectError::Missing { .. })
        ));
        assert!(matches!(
            tube(&p, &SHOCK_TUBE, Mode::FullyExperimental, None),
            Err(ProjectError::Missing { ref key }) if key == "vs1"
        ));

        let p = params("vs1_guess_1: None\nvs1_limits: None\np1: 1000.0\nvs1: 1500.0\n");
        let t = tube(&p, &SHOCK_TUBE, Mode::FullyExperimental, None).unwrap();
        assert_eq!(t.mode, TubeMode::Experimental);
        assert_eq!(t.shock_speed.unwrap().value, 1500.0);
    }

    #[test]
    fn fill_temperature_alias() {
        let p = params("p1: 1000.0\nT_0: 290.0\n");
        let t = tube(&p, &SHOCK_TUBE, Mode::FullyTheoretical, None).unwrap();
        assert_eq!(t.t_fill.value, 290.0);
    }

    #[test]
    fn unknown_gas_model_rejected() {
        assert!(gas_model(&params("")).is_ok());
        assert!(gas_model(&params("gas_model: cea\n")).is_err());
    }
}
