//! Identifier and time types shared by every simulator component.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulated time. Never wall-clock; the driver starts every run at `0.0`.
pub type SimTime = f64;

/// Identifier carried by jobs: the originating request id for work and
/// reconfiguration jobs, [`SYSTEM_JOB_ID`] for system jobs.
pub type JobId = String;

/// Id shared by every turn-on, turn-off and frequency job.
pub const SYSTEM_JOB_ID: &str = "SYSTEM";

/// Stable index of a server inside the scheduler's server registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerId(pub usize);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server-{}", self.0)
    }
}

/// Stable index of a job inside the scheduler's job arena.
///
/// Keys are handed out by `Scheduler::add_job` and never reused, so a key
/// stays valid after the job is archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobKey(pub usize);

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
