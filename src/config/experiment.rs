//! Experiment configuration structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::infra::WorkloadParams;
use crate::policies::{FifoDvfs, FifoReconfig, PolicyKind};
use crate::runtime::DriverConfig;
use crate::util::SimTime;

/// One named experiment: a policy run `num_experiments` times on fresh
/// workloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Policy under test.
    pub policy: PolicyKind,
    /// Base seed; run `i` uses `seed + i`.
    pub seed: u64,
    /// Time between two checkpoints.
    pub period: SimTime,
    /// Number of independent runs.
    pub num_experiments: usize,
    /// Servers per run.
    pub num_servers: usize,
    /// Requests per run.
    pub num_jobs: usize,
    /// Add a checkpoint at each request submission.
    pub update_on_arrival: bool,
    /// Add a checkpoint at each job departure.
    pub update_on_departure: bool,
    /// Abort runs still working at this time.
    pub time_limit: Option<SimTime>,
    /// Mass above which `fifo_dvfs` runs a request at high frequency.
    pub dvfs_mass_threshold: f64,
    /// Runtime a job needs before `fifo_reconfig` reconfigures it.
    pub reconfig_min_runtime: SimTime,
    /// Workload source parameters.
    pub workload: WorkloadParams,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::default(),
            seed: 1,
            period: 10.0,
            num_experiments: 1,
            num_servers: 5,
            num_jobs: 40,
            update_on_arrival: false,
            update_on_departure: false,
            time_limit: None,
            dvfs_mass_threshold: FifoDvfs::MASS_THRESHOLD,
            reconfig_min_runtime: FifoReconfig::MIN_RUNTIME,
            workload: WorkloadParams::default(),
        }
    }
}

impl ExperimentConfig {
    /// Validate experiment configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.period.is_finite() && self.period >= 1.0) {
            return Err("period must be at least 1".into());
        }
        if self.num_experiments == 0 {
            return Err("num_experiments must be greater than 0".into());
        }
        if self.num_servers == 0 {
            return Err("num_servers must be greater than 0".into());
        }
        if self.num_jobs == 0 {
            return Err("num_jobs must be greater than 0".into());
        }
        if self.time_limit.is_some_and(|t| !(t.is_finite() && t > 0.0)) {
            return Err("time_limit must be greater than 0".into());
        }
        if !(self.dvfs_mass_threshold >= 0.0) {
            return Err("dvfs_mass_threshold must not be negative".into());
        }
        if !(self.reconfig_min_runtime >= 0.0) {
            return Err("reconfig_min_runtime must not be negative".into());
        }
        self.workload
            .validate()
            .map_err(|e| format!("workload invalid: {e}"))
    }

    /// Event-loop parameters.
    #[must_use]
    pub const fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            period: self.period,
            update_on_arrival: self.update_on_arrival,
            update_on_departure: self.update_on_departure,
            time_limit: self.time_limit,
        }
    }
}

/// Root configuration: experiments by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Map of experiment name to configuration.
    pub experiments: BTreeMap<String, ExperimentConfig>,
}

impl SimulationConfig {
    /// Validate all experiments and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.experiments.is_empty() {
            return Err("at least one experiment must be defined".into());
        }
        for (name, experiment) in &self.experiments {
            experiment
                .validate()
                .map_err(|e| format!("experiment `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse simulation configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
