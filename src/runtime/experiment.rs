//! Repeated, independently seeded runs of one configuration.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::ExperimentConfig;
use crate::core::{Scheduler, SimulationError};
use crate::infra::WorkloadGenerator;
use crate::runtime::{Driver, RunOutcome};

/// A validated experiment.
#[derive(Debug, Clone)]
pub struct Experiment {
    name: String,
    config: ExperimentConfig,
    generator: WorkloadGenerator,
}

impl Experiment {
    /// Validate `config` and prepare the workload source.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Config`] when a value is out of range.
    pub fn new(name: impl Into<String>, config: ExperimentConfig) -> Result<Self, SimulationError> {
        let name = name.into();
        config
            .validate()
            .map_err(|e| SimulationError::Config(format!("experiment `{name}`: {e}")))?;
        let generator = WorkloadGenerator::new(&config.workload)?;
        Ok(Self {
            name,
            config,
            generator,
        })
    }

    /// Experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated configuration.
    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Seed of run `index`.
    #[must_use]
    pub const fn seed(&self, index: usize) -> u64 {
        self.config.seed.wrapping_add(index as u64)
    }

    /// Execute run `index` on its own workload, scheduler and generator.
    ///
    /// # Errors
    ///
    /// Whatever the driver returns; sibling runs are unaffected.
    pub fn run_one(&self, index: usize) -> Result<RunOutcome, SimulationError> {
        let seed = self.seed(index);
        let span = tracing::info_span!("experiment", name = %self.name, index, seed);
        let _enter = span.enter();

        let mut rng = StdRng::seed_from_u64(seed);
        let workload = self
            .generator
            .generate(&mut rng, self.config.num_jobs, self.config.num_servers);
        let driver = Driver::new(
            self.config.driver_config(),
            Scheduler::new(self.config.num_servers),
            self.config.policy.build(&self.config),
            rng,
        )?;
        let outcome = driver.run(workload);
        if let Err(e) = &outcome {
            tracing::error!("run failed: {}", e);
        }
        outcome
    }

    /// Execute every run in index order.
    pub fn run(&self) -> Vec<Result<RunOutcome, SimulationError>> {
        tracing::info!(
            "running {} with {} on seed {}: {} jobs, {} servers, {} runs",
            self.name,
            self.config.policy.name(),
            self.config.seed,
            self.config.num_jobs,
            self.config.num_servers,
            self.config.num_experiments
        );
        (0..self.config.num_experiments)
            .map(|index| self.run_one(index))
            .collect()
    }
}
