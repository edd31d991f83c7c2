//! Serializable summary of an evaluated gas path.

use std::fmt::Write as _;

use gp_gas::NamedState;
use gp_path::GasPath;
use serde::Serialize;

use crate::ProjectResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateReport {
    pub name: String,
    pub gas: String,
    /// Pa
    pub p: f64,
    /// K
    pub t: f64,
    /// kg/m^3
    pub rho: f64,
    /// m/s
    pub u: f64,
    /// m/s
    pub a: f64,
    pub mach: f64,
    pub gamma: f64,
    /// J/(kg K)
    pub r: f64,
}

impl From<&NamedState> for StateReport {
    fn from(named: &NamedState) -> Self {
        let s = &named.state;
        Self {
            name: named.name.clone(),
            gas: s.gas().name().to_string(),
            p: s.pressure().value,
            t: s.temperature().value,
            rho: s.density().value,
            u: s.velocity().value,
            a: s.sound_speed().value,
            mach: s.mach_number(),
            gamma: s.gamma(),
            r: s.gas_constant(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputReport {
    pub name: String,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub role: String,
    pub kind: String,
    pub entrance: String,
    pub exit: String,
    pub outputs: Vec<OutputReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathReport {
    pub facility_type: String,
    pub stages: Vec<StageReport>,
    pub states: Vec<StateReport>,
}

impl PathReport {
    pub fn from_path(path: &GasPath) -> Self {
        let stages = path
            .stages()
            .iter()
            .map(|stage| StageReport {
                role: stage.role().to_string(),
                kind: stage.kind().to_string(),
                entrance: stage.entrance_state().name.clone(),
                exit: stage.exit_state().name.clone(),
                outputs: stage
                    .outputs()
                    .into_iter()
                    .map(|o| OutputReport {
                        name: o.name.to_string(),
                        value: o.value,
                        unit: o.unit.to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            facility_type: path.topology().flags().facility_type.to_string(),
            stages,
            states: path.states().into_iter().map(StateReport::from).collect(),
        }
    }

    pub fn to_json(&self) -> ProjectResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fixed-width table of every state, one row per state.
    pub fn state_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:<8} {:>12} {:>10} {:>12} {:>10} {:>10} {:>7} {:>6}",
            "state", "gas", "p (Pa)", "T (K)", "rho (kg/m3)", "u (m/s)", "a (m/s)", "M", "gamma"
        );
        for s in &self.states {
            let _ = writeln!(
                out,
                "{:<10} {:<8} {:>12.4e} {:>10.1} {:>12.4e} {:>10.1} {:>10.1} {:>7.3} {:>6.3}",
                s.name, s.gas, s.p, s.t, s.rho, s.u, s.a, s.mach, s.gamma
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Condition;

    const SHOCK_TUBE: &str = "
facility_type: shock_tube
T_0: 300.0
driver_gas_name: air
p4: 1.0e6
p1: 1000.0
";

    fn report() -> PathReport {
        let condition = Condition::from_yaml_str(SHOCK_TUBE).unwrap();
        let config = condition.facility_config().unwrap();
        let model = condition.gas_model().unwrap();
        let path = GasPath::evaluate(&config, model.as_ref()).unwrap();
        PathReport::from_path(&path)
    }

    #[test]
    fn stages_and_states_listed_in_flow_order() {
        let report = report();
        let roles: Vec<&str> = report.stages.iter().map(|s| s.role.as_str()).collect();
        assert_eq!(
            roles,
            ["driver", "primary_diaphragm", "shock_tube", "secondary_diaphragm", "test_section"]
        );
        assert_eq!(report.states.first().map(|s| s.name.as_str()), Some("state4i"));
        assert!(report.states.iter().any(|s| s.name == "state2"));
        assert!(report.states.iter().any(|s| s.name == "state10f"));
        assert!(report.stages[2].outputs.iter().any(|o| o.name == "shock_speed"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["facility_type"], "shock_tube");
        assert!(value["states"].as_array().is_some_and(|s| !s.is_empty()));
    }

    #[test]
    fn table_has_row_per_state() {
        let report = report();
        let table = report.state_table();
        assert_eq!(table.lines().count(), report.states.len() + 1);
    }
}
