//! Checkpoint-driven event loop.
//!
//! The driver advances simulated time from 0 by the checkpoint period,
//! feeding due requests to the scheduler and invoking the policy at each
//! checkpoint. The two reaction flags pull the next checkpoint forward to
//! the next arrival or departure.

use std::collections::VecDeque;

use rand::rngs::StdRng;

use crate::core::{Policy, Request, Scheduler, SimulationError};
use crate::util::SimTime;

/// Loop parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    /// Time between two checkpoints.
    pub period: SimTime,
    /// Also stop at the next request submission.
    pub update_on_arrival: bool,
    /// Also stop at the next job departure.
    pub update_on_departure: bool,
    /// Abort the run once the clock reaches this time.
    pub time_limit: Option<SimTime>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            period: 10.0,
            update_on_arrival: false,
            update_on_departure: false,
            time_limit: None,
        }
    }
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Stopped scheduler holding the full job history.
    pub scheduler: Scheduler,
    /// Time at which the scheduler was stopped.
    pub end_time: SimTime,
    /// Number of policy invocations.
    pub checkpoints: usize,
    /// Whether the time limit cut the run short.
    pub timed_out: bool,
}

/// Runs one policy over one workload.
pub struct Driver {
    config: DriverConfig,
    scheduler: Scheduler,
    policy: Box<dyn Policy>,
    rng: StdRng,
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("policy", &self.policy.name())
            .finish_non_exhaustive()
    }
}

impl Driver {
    /// Assemble a driver.
    ///
    /// # Errors
    ///
    /// [`SimulationError::Config`] if the period is not a positive finite
    /// number or the time limit is not positive.
    pub fn new(
        config: DriverConfig,
        scheduler: Scheduler,
        policy: Box<dyn Policy>,
        rng: StdRng,
    ) -> Result<Self, SimulationError> {
        if !(config.period.is_finite() && config.period > 0.0) {
            return Err(SimulationError::Config(format!(
                "period {} must be positive",
                config.period
            )));
        }
        if config.time_limit.is_some_and(|limit| !(limit > 0.0)) {
            return Err(SimulationError::Config("time_limit must be positive".into()));
        }
        Ok(Self {
            config,
            scheduler,
            policy,
            rng,
        })
    }

    /// Run `workload` to completion, then stop the scheduler.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidWorkload`] if submission times decrease or a
    /// request can never be placed on the pool, otherwise the first error
    /// raised by the policy or the scheduler.
    pub fn run(mut self, workload: Vec<Request>) -> Result<RunOutcome, SimulationError> {
        let server_count = self.scheduler.servers().len();
        for request in &workload {
            request
                .validate(server_count)
                .map_err(SimulationError::InvalidWorkload)?;
        }
        if let Some(pair) = workload
            .windows(2)
            .find(|w| !(w[0].submission_time <= w[1].submission_time))
        {
            return Err(SimulationError::InvalidWorkload(format!(
                "{} submitted at {} after {} at {}",
                pair[1].id, pair[1].submission_time, pair[0].id, pair[0].submission_time
            )));
        }

        let mut pending: VecDeque<Request> = workload.into();
        let mut time: SimTime = 0.0;
        let mut checkpoints = 0;
        let mut timed_out = false;
        tracing::info!(
            "running {} on {} requests and {} servers",
            self.policy.name(),
            pending.len(),
            self.scheduler.servers().len()
        );

        while !pending.is_empty() || self.scheduler.is_working() {
            if let Some(limit) = self.config.time_limit {
                if time >= limit {
                    tracing::warn!(
                        "{} still working at time limit {}, {} requests never submitted",
                        self.policy.name(),
                        limit,
                        pending.len()
                    );
                    timed_out = true;
                    break;
                }
            }

            while pending.front().is_some_and(|r| r.submission_time <= time) {
                if let Some(request) = pending.pop_front() {
                    self.scheduler.schedule(request);
                }
            }
            self.policy.update(&mut self.scheduler, time, &mut self.rng)?;
            checkpoints += 1;

            time = self.next_checkpoint(time, pending.front());
        }

        self.scheduler.stop(time)?;
        tracing::info!("{} stopped at {} after {} checkpoints", self.policy.name(), time, checkpoints);
        Ok(RunOutcome {
            scheduler: self.scheduler,
            end_time: time,
            checkpoints,
            timed_out,
        })
    }

    fn next_checkpoint(&self, time: SimTime, next_arrival: Option<&Request>) -> SimTime {
        let mut next = time + self.config.period;
        if self.config.update_on_arrival {
            if let Some(request) = next_arrival {
                next = next.min(request.submission_time);
            }
        }
        if self.config.update_on_departure {
            if let Some(departure) = self.scheduler.next_departure().filter(|d| *d > time) {
                next = next.min(departure);
            }
        }
        next
    }
}
