//! FIFO with server power management.

use rand::rngs::StdRng;

use crate::core::{remove_over_jobs, Policy, Scheduler, SimulationError, DURATION_TURN_ON};
use crate::policies::Fifo;
use crate::util::{ServerId, SimTime};

/// [`Fifo`] placement. Idle servers are turned off once the queue drains;
/// off servers are turned on when the head request lacks servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoShutdown;

fn booting(scheduler: &Scheduler, time: SimTime) -> usize {
    scheduler
        .servers()
        .iter()
        .filter(|s| s.is_turned_on(time) && s.time_turn_on(time).is_some_and(|beg| time < beg + DURATION_TURN_ON))
        .count()
}

impl Policy for FifoShutdown {
    fn name(&self) -> &str {
        "fifo_shutdown"
    }

    fn update(
        &mut self,
        scheduler: &mut Scheduler,
        time: SimTime,
        _rng: &mut StdRng,
    ) -> Result<(), SimulationError> {
        remove_over_jobs(scheduler, time)?;
        Fifo::schedule_pending(scheduler, time)?;

        let Some(head) = scheduler.peek_request() else {
            let idle: Vec<ServerId> = scheduler
                .servers()
                .iter()
                .filter(|s| s.is_turnable_off(time))
                .map(|s| s.id())
                .collect();
            if !idle.is_empty() {
                scheduler.turn_off_servers(time, &idle)?;
            }
            return Ok(());
        };

        let coming = scheduler.servers_available(time).len() + booting(scheduler, time);
        let missing = head.min_server_count.saturating_sub(coming);
        if missing > 0 {
            let dark: Vec<ServerId> = scheduler
                .servers()
                .iter()
                .filter(|s| s.is_turnable_on(time) && !s.is_busy(time))
                .map(|s| s.id())
                .take(missing)
                .collect();
            if !dark.is_empty() {
                scheduler.turn_on_servers(time, &dark)?;
            }
        }
        Ok(())
    }
}
