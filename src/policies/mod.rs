//! FIFO family of scheduling policies.
//!
//! Every policy first archives the jobs that are over, then admits requests
//! strictly in queue order: a head request that cannot be placed blocks the
//! ones behind it.

pub mod fifo;
pub mod fifo_dvfs;
pub mod fifo_max;
pub mod fifo_reconfig;
pub mod fifo_shutdown;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::ExperimentConfig;
use crate::core::{Job, Policy, Request, Scheduler, SimulationError};
use crate::util::{ServerId, SimTime};

pub use fifo::Fifo;
pub use fifo_dvfs::FifoDvfs;
pub use fifo_max::FifoMax;
pub use fifo_reconfig::FifoReconfig;
pub use fifo_shutdown::FifoShutdown;

/// Policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Minimum server count, lowest ids first.
    #[default]
    Fifo,
    /// As many servers as the request accepts.
    FifoMax,
    /// Fifo with server power management.
    FifoShutdown,
    /// FifoMax with per-job frequency selection.
    FifoDvfs,
    /// Fifo with shrinking and growing of running jobs.
    FifoReconfig,
}

impl PolicyKind {
    /// Stable name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::FifoMax => "fifo_max",
            Self::FifoShutdown => "fifo_shutdown",
            Self::FifoDvfs => "fifo_dvfs",
            Self::FifoReconfig => "fifo_reconfig",
        }
    }

    /// Build the policy with the tunables of `config`.
    #[must_use]
    pub fn build(self, config: &ExperimentConfig) -> Box<dyn Policy> {
        match self {
            Self::Fifo => Box::new(Fifo),
            Self::FifoMax => Box::new(FifoMax),
            Self::FifoShutdown => Box::new(FifoShutdown),
            Self::FifoDvfs => Box::new(FifoDvfs::new(config.dvfs_mass_threshold)),
            Self::FifoReconfig => Box::new(FifoReconfig::new(config.reconfig_min_runtime)),
        }
    }
}

/// Place head-of-queue requests while `pick` finds servers for them.
///
/// Each admitted job runs at the frequency of its first server. Returns the
/// number of admitted requests.
pub(crate) fn admit_in_order(
    scheduler: &mut Scheduler,
    time: SimTime,
    mut pick: impl FnMut(&Request, &[ServerId]) -> Option<Vec<ServerId>>,
) -> Result<usize, SimulationError> {
    let mut admitted = 0;
    loop {
        let available = scheduler.servers_available(time);
        if available.is_empty() {
            break;
        }
        let Some(request) = scheduler.peek_request() else {
            break;
        };
        let Some(servers) = pick(request, &available) else {
            break;
        };
        let Some(&first) = servers.first() else {
            break;
        };
        let frequency = scheduler.server(first)?.get_frequency(time);
        let job = Job::from_request(time, request, servers, frequency)?;
        scheduler.add_job(job)?;
        scheduler.pop_request();
        admitted += 1;
    }
    Ok(admitted)
}

/// `count` servers drawn uniformly from `available`, sorted by id.
pub(crate) fn draw_servers(rng: &mut StdRng, available: &[ServerId], count: usize) -> Vec<ServerId> {
    let mut picked: Vec<_> = rand::seq::index::sample(rng, available.len(), count)
        .into_iter()
        .map(|i| available[i])
        .collect();
    picked.sort_unstable();
    picked
}
