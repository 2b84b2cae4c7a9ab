//! Frequency-aware FIFO.

use rand::rngs::StdRng;

use crate::core::{remove_over_jobs, Job, Policy, Scheduler, SimulationError};
use crate::policies::FifoMax;
use crate::util::SimTime;

/// [`FifoMax`] placement. Requests heavier than the mass threshold run at
/// the servers' highest common frequency, the others at the lowest. The
/// work starts once the frequency changes are over.
#[derive(Debug, Clone, Copy)]
pub struct FifoDvfs {
    mass_threshold: f64,
}

impl FifoDvfs {
    /// Default mass above which a request runs at high frequency.
    pub const MASS_THRESHOLD: f64 = 500.0;

    /// Policy switching frequency at `mass_threshold`.
    #[must_use]
    pub const fn new(mass_threshold: f64) -> Self {
        Self { mass_threshold }
    }
}

impl Default for FifoDvfs {
    fn default() -> Self {
        Self::new(Self::MASS_THRESHOLD)
    }
}

impl Policy for FifoDvfs {
    fn name(&self) -> &str {
        "fifo_dvfs"
    }

    fn update(
        &mut self,
        scheduler: &mut Scheduler,
        time: SimTime,
        rng: &mut StdRng,
    ) -> Result<(), SimulationError> {
        remove_over_jobs(scheduler, time)?;

        loop {
            let available = scheduler.servers_available(time);
            if available.is_empty() {
                break;
            }
            let Some(request) = scheduler.peek_request() else {
                break;
            };
            let Some(servers) =
                FifoMax::pick(rng, request.min_server_count, request.max_server_count, &available)
            else {
                break;
            };
            let heavy = request.mass > self.mass_threshold;

            let mut frequency = if heavy { f64::INFINITY } else { 0.0 };
            for &id in &servers {
                let server = scheduler.server(id)?;
                frequency = if heavy {
                    frequency.min(server.max_frequency())
                } else {
                    frequency.max(server.min_frequency())
                };
            }

            let Some(request) = scheduler.pop_request() else {
                break;
            };
            let changes = scheduler.set_servers_frequency(time, frequency, &servers)?;
            let start = changes
                .iter()
                .filter_map(|&k| scheduler.job(k).map(Job::time_end))
                .fold(time, f64::max);
            let job = Job::from_request(start, &request, servers, frequency)?;
            scheduler.add_job(job)?;
        }
        Ok(())
    }
}
