//! Reference policy.

use rand::rngs::StdRng;

use crate::core::{remove_over_jobs, Policy, Scheduler, SimulationError};
use crate::policies::admit_in_order;
use crate::util::SimTime;

/// Runs each request on its minimum server count, lowest ids first, in
/// submission order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl Fifo {
    pub(crate) fn schedule_pending(scheduler: &mut Scheduler, time: SimTime) -> Result<usize, SimulationError> {
        admit_in_order(scheduler, time, |request, available| {
            Scheduler::sample_servers(request.min_server_count, available)
        })
    }
}

impl Policy for Fifo {
    fn name(&self) -> &str {
        "fifo"
    }

    fn update(
        &mut self,
        scheduler: &mut Scheduler,
        time: SimTime,
        _rng: &mut StdRng,
    ) -> Result<(), SimulationError> {
        remove_over_jobs(scheduler, time)?;
        Self::schedule_pending(scheduler, time)?;
        Ok(())
    }
}
