//! Capability interface implemented by scheduling policies.

use rand::rngs::StdRng;

use crate::core::{Scheduler, SimulationError};
use crate::util::SimTime;

/// A scheduling strategy driven at every checkpoint.
///
/// Policies act on the scheduler only through its public primitives
/// (`add_job`, `remove_job`, `reconfigure_job`, server queries and power
/// operations), so the core keeps its invariants whatever the policy
/// decides. Any randomness must come from `rng`, which the driver seeds per
/// run.
pub trait Policy {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    /// Make scheduling decisions at `time`.
    ///
    /// # Errors
    ///
    /// An error from a scheduler primitive; the driver aborts the run on it.
    fn update(
        &mut self,
        scheduler: &mut Scheduler,
        time: SimTime,
        rng: &mut StdRng,
    ) -> Result<(), SimulationError>;
}

/// Archive every active job that is over at `time`.
///
/// Shared first step of the FIFO family.
///
/// # Errors
///
/// Propagates [`Scheduler::remove_job`] failures.
pub fn remove_over_jobs(scheduler: &mut Scheduler, time: SimTime) -> Result<usize, SimulationError> {
    let over: Vec<_> = scheduler
        .active()
        .filter(|(_, job)| job.is_over(time))
        .map(|(key, _)| key)
        .collect();
    for &key in &over {
        scheduler.remove_job(time, key)?;
    }
    Ok(over.len())
}
