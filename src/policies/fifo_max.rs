//! Widest-placement FIFO.

use rand::rngs::StdRng;

use crate::core::{remove_over_jobs, Policy, Scheduler, SimulationError};
use crate::policies::{admit_in_order, draw_servers};
use crate::util::{ServerId, SimTime};

/// Runs each request on as many available servers as it accepts, drawn at
/// random with the run's generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoMax;

impl FifoMax {
    pub(crate) fn pick(
        rng: &mut StdRng,
        min: usize,
        max: usize,
        available: &[ServerId],
    ) -> Option<Vec<ServerId>> {
        if min > available.len() {
            return None;
        }
        Some(draw_servers(rng, available, max.min(available.len())))
    }
}

impl Policy for FifoMax {
    fn name(&self) -> &str {
        "fifo_max"
    }

    fn update(
        &mut self,
        scheduler: &mut Scheduler,
        time: SimTime,
        rng: &mut StdRng,
    ) -> Result<(), SimulationError> {
        remove_over_jobs(scheduler, time)?;
        admit_in_order(scheduler, time, |request, available| {
            Self::pick(rng, request.min_server_count, request.max_server_count, available)
        })?;
        Ok(())
    }
}
