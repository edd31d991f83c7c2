//! Independent facility evaluations run in parallel.
//!
//! Each point builds its own [`FacilityConfig`] and evaluates its own
//! [`GasPath`]; nothing is shared between points except the gas model.

use rayon::prelude::*;
use tracing::warn;

use crate::config::FacilityConfig;
use crate::error::PathResult;
use crate::gas_path::GasPath;
use gp_gas::GasModel;

/// Outcome of one sweep point.
#[derive(Debug)]
pub struct SweepPoint<V> {
    pub value: V,
    pub result: PathResult<GasPath>,
}

/// Evaluate one gas path per value on the rayon pool.
///
/// `build` turns a sweep value into a configuration. Failures are reported
/// per point; results come back in the order of `values`.
pub fn run_sweep<V, F>(values: &[V], build: F, model: &dyn GasModel) -> Vec<SweepPoint<V>>
where
    V: Clone + Send + Sync,
    F: Fn(&V) -> PathResult<FacilityConfig> + Sync,
{
    values
        .par_iter()
        .map(|value| {
            let result = build(value).and_then(|config| GasPath::evaluate(&config, model));
            if let Err(e) = &result {
                warn!(error = %e, "sweep point failed");
            }
            SweepPoint {
                value: value.clone(),
                result,
            }
        })
        .collect()
}

/// Sweep a single typed field of a base configuration.
pub fn vary<V, A>(
    base: &FacilityConfig,
    values: &[V],
    apply: A,
    model: &dyn GasModel,
) -> Vec<SweepPoint<V>>
where
    V: Clone + Send + Sync,
    A: Fn(&mut FacilityConfig, &V) + Sync,
{
    run_sweep(
        values,
        |value| {
            let mut config = base.clone();
            apply(&mut config, value);
            Ok(config)
        },
        model,
    )
}
