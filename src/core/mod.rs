//! Entity model, reconfiguration calculus and scheduler bookkeeping.

pub mod error;
pub mod job;
pub mod policy;
pub mod reconfiguration;
pub mod request;
pub mod scheduler;
pub mod server;

pub use error::{AppResult, SimulationError};
pub use job::{
    reconfiguration_duration, Job, JobKind, JobStatus, ReconfigurationPayload, TraceRow,
    WorkPayload, DURATION_FREQUENCY, DURATION_TURN_OFF, DURATION_TURN_ON,
};
pub use policy::{remove_over_jobs, Policy};
pub use reconfiguration::Reconfiguration;
pub use request::{Request, SpeedFactor};
pub use scheduler::Scheduler;
pub use server::{Assignment, Server, Transition, TransitionKind, DEFAULT_FREQUENCIES};
