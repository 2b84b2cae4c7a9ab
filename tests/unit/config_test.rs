//! Tests for configuration validation

use malleable_sim::config::{ExperimentConfig, SimulationConfig};
use malleable_sim::policies::PolicyKind;

#[test]
fn test_experiment_config_defaults() {
    let cfg = ExperimentConfig::default();
    assert_eq!(cfg.seed, 1);
    assert_eq!(cfg.period, 10.0);
    assert_eq!(cfg.num_experiments, 1);
    assert_eq!(cfg.num_servers, 5);
    assert_eq!(cfg.num_jobs, 40);
    assert!(!cfg.update_on_arrival);
    assert!(!cfg.update_on_departure);
    assert_eq!(cfg.policy, PolicyKind::Fifo);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_experiment_config_invalid_period() {
    let cfg = ExperimentConfig {
        period: 0.5,
        ..ExperimentConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_experiment_config_invalid_counts() {
    for cfg in [
        ExperimentConfig {
            num_experiments: 0,
            ..ExperimentConfig::default()
        },
        ExperimentConfig {
            num_servers: 0,
            ..ExperimentConfig::default()
        },
        ExperimentConfig {
            num_jobs: 0,
            ..ExperimentConfig::default()
        },
        ExperimentConfig {
            time_limit: Some(-1.0),
            ..ExperimentConfig::default()
        },
    ] {
        assert!(cfg.validate().is_err());
    }
}

#[test]
fn test_simulation_config_from_json() {
    let json = r#"{
        "experiments": {
            "baseline": {},
            "dvfs": { "policy": "fifo_dvfs", "seed": 7, "num_servers": 8, "update_on_departure": true }
        }
    }"#;
    let cfg = SimulationConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.experiments.len(), 2);
    assert_eq!(cfg.experiments["baseline"], ExperimentConfig::default());
    let dvfs = &cfg.experiments["dvfs"];
    assert_eq!(dvfs.policy, PolicyKind::FifoDvfs);
    assert_eq!(dvfs.seed, 7);
    assert_eq!(dvfs.num_jobs, 40);
    assert!(dvfs.update_on_departure);
}

#[test]
fn test_simulation_config_rejections() {
    assert!(SimulationConfig::from_json_str(r#"{"experiments": {}}"#).is_err());
    assert!(SimulationConfig::from_json_str("not json").is_err());

    let err = SimulationConfig::from_json_str(r#"{"experiments": {"x": {"num_jobs": 0}}}"#)
        .unwrap_err();
    assert_eq!(err, "experiment `x` invalid: num_jobs must be greater than 0");

    let err = SimulationConfig::from_json_str(
        r#"{"experiments": {"x": {"workload": {"disparity": 0.1}}}}"#,
    )
    .unwrap_err();
    assert!(err.contains("workload invalid"));
}
