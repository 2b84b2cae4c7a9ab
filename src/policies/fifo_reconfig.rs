//! Malleable FIFO: shrinks running jobs under pressure, grows them when idle.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::core::{remove_over_jobs, Policy, Scheduler, SimulationError};
use crate::policies::{draw_servers, Fifo};
use crate::util::{JobKey, SimTime};

/// [`Fifo`] placement plus one-server reconfigurations of work jobs that
/// have run longer than the minimum runtime.
///
/// Before admission, if fewer servers are available than requests wait,
/// every eligible job gives one server back. After admission, while
/// servers remain available, eligible jobs take one more.
#[derive(Debug, Clone, Copy)]
pub struct FifoReconfig {
    min_runtime: SimTime,
}

impl FifoReconfig {
    /// Default runtime a job needs before it is reconfigured.
    pub const MIN_RUNTIME: SimTime = 100.0;

    /// Policy reconfiguring jobs that ran more than `min_runtime`.
    #[must_use]
    pub const fn new(min_runtime: SimTime) -> Self {
        Self { min_runtime }
    }

    fn candidates(&self, scheduler: &Scheduler, time: SimTime) -> Vec<JobKey> {
        scheduler
            .active()
            .filter(|(_, job)| job.is_work() && job.is_interruptible(time))
            .filter(|(_, job)| time - job.time_beg() > self.min_runtime)
            .map(|(key, _)| key)
            .collect()
    }

    fn shrink(&self, scheduler: &mut Scheduler, time: SimTime, rng: &mut StdRng) -> Result<(), SimulationError> {
        if scheduler.servers_available(time).len() >= scheduler.request_queue().len() {
            return Ok(());
        }
        for key in self.candidates(scheduler, time) {
            let Some(job) = scheduler.job(key) else {
                continue;
            };
            let width = job.servers().len();
            if width < 2 {
                continue;
            }
            let target = draw_servers(rng, job.servers(), width - 1);
            if job.is_reconfigurable_servers(time, scheduler.servers(), &target, false) {
                scheduler.reconfigure_job(time, key, Some(&target), None, false, false)?;
            }
        }
        Ok(())
    }

    fn grow(&self, scheduler: &mut Scheduler, time: SimTime, rng: &mut StdRng) -> Result<(), SimulationError> {
        for key in self.candidates(scheduler, time) {
            let available = scheduler.servers_available(time);
            let (Some(job), Some(&extra)) = (scheduler.job(key), available.choose(rng)) else {
                break;
            };
            let mut target = job.servers().to_vec();
            target.push(extra);
            if job.is_reconfigurable_servers(time, scheduler.servers(), &target, false) {
                scheduler.reconfigure_job(time, key, Some(&target), None, false, false)?;
            }
        }
        Ok(())
    }
}

impl Default for FifoReconfig {
    fn default() -> Self {
        Self::new(Self::MIN_RUNTIME)
    }
}

impl Policy for FifoReconfig {
    fn name(&self) -> &str {
        "fifo_reconfig"
    }

    fn update(
        &mut self,
        scheduler: &mut Scheduler,
        time: SimTime,
        rng: &mut StdRng,
    ) -> Result<(), SimulationError> {
        remove_over_jobs(scheduler, time)?;
        self.shrink(scheduler, time, rng)?;
        Fifo::schedule_pending(scheduler, time)?;
        self.grow(scheduler, time, rng)?;
        Ok(())
    }
}
