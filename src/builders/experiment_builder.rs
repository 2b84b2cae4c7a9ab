//! Builders to construct experiments from configuration.

use std::collections::BTreeMap;

use crate::config::SimulationConfig;
use crate::core::SimulationError;
use crate::runtime::Experiment;

/// Build every experiment of `cfg`, keyed by name.
///
/// A malformed experiment yields an `Err` under its name and leaves its
/// siblings buildable.
///
/// # Errors
///
/// [`SimulationError::Config`] when no experiment is defined.
pub fn build_experiments(
    cfg: &SimulationConfig,
) -> Result<BTreeMap<String, Result<Experiment, SimulationError>>, SimulationError> {
    if cfg.experiments.is_empty() {
        return Err(SimulationError::Config(
            "at least one experiment must be defined".into(),
        ));
    }

    let mut experiments = BTreeMap::new();
    for (name, experiment_cfg) in &cfg.experiments {
        let experiment = Experiment::new(name.clone(), experiment_cfg.clone());
        if let Err(e) = &experiment {
            tracing::error!("experiment `{}` rejected: {}", name, e);
        }
        experiments.insert(name.clone(), experiment);
    }

    Ok(experiments)
}
