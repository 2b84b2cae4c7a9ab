//! Tests for builder modules

use std::collections::BTreeMap;

use malleable_sim::builders::build_experiments;
use malleable_sim::config::{ExperimentConfig, SimulationConfig};
use malleable_sim::core::SimulationError;

#[test]
fn test_build_experiments_isolates_failures() {
    let mut experiments = BTreeMap::new();
    experiments.insert("good".to_string(), ExperimentConfig::default());
    experiments.insert(
        "bad".to_string(),
        ExperimentConfig {
            num_servers: 0,
            ..ExperimentConfig::default()
        },
    );
    let built = build_experiments(&SimulationConfig { experiments }).unwrap();

    assert_eq!(built.len(), 2);
    let good = built["good"].as_ref().unwrap();
    assert_eq!(good.name(), "good");
    assert_eq!(good.config().num_jobs, 40);
    assert!(matches!(built["bad"], Err(SimulationError::Config(_))));
}

#[test]
fn test_build_experiments_requires_one() {
    let result = build_experiments(&SimulationConfig::default());
    assert!(matches!(result, Err(SimulationError::Config(_))));
}
