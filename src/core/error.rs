//! Error types for simulator operations.

use thiserror::Error;

use crate::util::{JobId, JobKey, ServerId, SimTime};

/// Errors produced by simulator components.
///
/// Two families exist. Invariant violations (see
/// [`SimulationError::is_invariant_violation`]) mean a policy or the core
/// itself broke a contract and the run must be abandoned. The remaining
/// variants are input or configuration errors raised at the boundary that
/// builds a run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A job could not be built from the supplied values.
    #[error("invalid job {id}: {reason}")]
    InvalidJob {
        /// Id of the offending job.
        id: JobId,
        /// What was wrong.
        reason: String,
    },
    /// The job already completed or was interrupted.
    #[error("job {id} already terminated")]
    AlreadyTerminated {
        /// Id of the offending job.
        id: JobId,
    },
    /// A complete/interrupt call whose time precondition does not hold.
    #[error("invalid transition for job {id} at {time}: {reason}")]
    InvalidTransition {
        /// Id of the offending job.
        id: JobId,
        /// Simulated time of the call.
        time: SimTime,
        /// What was wrong.
        reason: String,
    },
    /// System jobs run to completion.
    #[error("job {id} is not interruptible")]
    NotInterruptible {
        /// Id of the offending job.
        id: JobId,
    },
    /// Attaching the job would overlap an interval already on the server.
    #[error("job {job} overlaps an assigned job on {server}")]
    Overlap {
        /// Server whose timeline would be corrupted.
        server: ServerId,
        /// Id of the job being attached.
        job: JobId,
    },
    /// The server id is not part of the registry.
    #[error("unknown server {0}")]
    UnknownServer(ServerId),
    /// The job key is not (or no longer) in the active set.
    #[error("job {0} is not active")]
    JobNotActive(JobKey),
    /// A reconfiguration was requested that the eligibility predicates reject.
    #[error("job {id} is not reconfigurable: {reason}")]
    NotReconfigurable {
        /// Id of the offending job.
        id: JobId,
        /// Why the reconfiguration is rejected.
        reason: String,
    },
    /// A server power or frequency operation whose precondition does not hold.
    #[error("invalid server operation on {server}: {reason}")]
    InvalidServerOperation {
        /// Target server.
        server: ServerId,
        /// Why the operation is rejected.
        reason: String,
    },
    /// A server could not be built from the supplied values.
    #[error("invalid server: {0}")]
    InvalidServer(String),
    /// The workload violates its ordering contract or could not be generated.
    #[error("invalid workload: {0}")]
    InvalidWorkload(String),
    /// Experiment parameters are malformed or out of range.
    #[error("config invalid: {0}")]
    Config(String),
    /// A trace sink failed to write.
    #[error("export error: {0}")]
    Export(String),
}

impl SimulationError {
    /// Returns true when the error signals a logic defect rather than bad input.
    ///
    /// Runs hitting one of these must be aborted; their state is corrupt.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::AlreadyTerminated { .. }
                | Self::InvalidTransition { .. }
                | Self::NotInterruptible { .. }
                | Self::Overlap { .. }
                | Self::UnknownServer(_)
                | Self::JobNotActive(_)
                | Self::NotReconfigurable { .. }
                | Self::InvalidServerOperation { .. }
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
