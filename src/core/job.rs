//! Job entity: a time interval on a set of servers with a per-kind payload.
//!
//! Status is derived from the interval and the queried time, never stored:
//!
//! - *pending*: `time < time_beg`
//! - *executing*: not terminal and `time_beg <= time < time_end`
//! - *over*: terminal, or `time >= time_end`
//!
//! A job becomes terminal exactly once, either *completed*
//! (`time_end_real == time_end`) or *interrupted* (`time_end_real < time_end`).

use serde::{Deserialize, Serialize};

use crate::core::{Request, SimulationError, SpeedFactor};
use crate::util::{JobId, ServerId, SimTime, SYSTEM_JOB_ID};

/// Duration of a server turn-on job.
pub const DURATION_TURN_ON: SimTime = 250.0;
/// Duration of a server turn-off job.
pub const DURATION_TURN_OFF: SimTime = 500.0;
/// Duration of a server frequency change job.
pub const DURATION_FREQUENCY: SimTime = 10.0;

/// Time needed to move a job from `ante` servers to `post` servers.
///
/// `data / max(ante, post) * floor(max(ante, post) / min(ante, post))`,
/// symmetric in `(ante, post)`. Counts below one are treated as one.
#[must_use]
pub fn reconfiguration_duration(data: f64, ante: usize, post: usize) -> SimTime {
    let maxi = ante.max(post).max(1);
    let mini = ante.min(post).max(1);
    data / maxi as f64 * (maxi / mini) as f64
}

/// Derived status of a job at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The job has not started.
    Pending,
    /// The job is running.
    Executing,
    /// The job ran out or was terminated.
    Over,
}

/// Payload of a work job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkPayload {
    /// Work left when this job starts.
    pub mass: f64,
    /// Amount of data moved by a reconfiguration.
    pub data: f64,
    /// Frequency the servers run at while executing this job.
    pub frequency: f64,
    /// Lower bound on the number of servers.
    pub min_servers: usize,
    /// Upper bound on the number of servers.
    pub max_servers: usize,
    /// Speedup as a function of server count.
    pub malleability_factor: SpeedFactor,
    /// Speedup as a function of frequency.
    pub frequency_factor: SpeedFactor,
}

impl WorkPayload {
    /// Build the payload for `request` running at `frequency`.
    #[must_use]
    pub fn from_request(request: &Request, frequency: f64) -> Self {
        Self {
            mass: request.mass,
            data: request.data,
            frequency,
            min_servers: request.min_server_count,
            max_servers: request.max_server_count,
            malleability_factor: request.malleability_factor,
            frequency_factor: request.frequency_factor,
        }
    }

    /// Returns true if the job may run on `n` servers.
    #[must_use]
    pub const fn is_executable_on(&self, n: usize) -> bool {
        self.min_servers <= n && n <= self.max_servers
    }

    /// Mass processed per time unit on `servers` servers.
    #[must_use]
    pub fn speed(&self, servers: usize) -> f64 {
        self.malleability_factor.eval(servers as f64) * self.frequency_factor.eval(self.frequency)
    }

    /// Same job characteristics with a different mass and frequency.
    #[must_use]
    pub fn continued(&self, mass: f64, frequency: f64) -> Self {
        Self {
            mass,
            frequency,
            ..self.clone()
        }
    }
}

/// Payload of a reconfiguration job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconfigurationPayload {
    /// Start of the work job being reconfigured (its id is this job's id).
    pub source_time_beg: SimTime,
    /// Servers the source job ran on.
    pub source_servers: Vec<ServerId>,
    /// Servers the continuation runs on.
    pub target_servers: Vec<ServerId>,
    /// Data moved between the two server sets.
    pub data: f64,
}

/// Per-kind payload of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobKind {
    /// Useful work for a request.
    Work(WorkPayload),
    /// Data movement between two server sets.
    Reconfiguration(ReconfigurationPayload),
    /// Server power-up.
    TurnOn,
    /// Server power-down.
    TurnOff,
    /// Server frequency change.
    Frequency {
        /// Frequency in effect once the job is over.
        frequency: f64,
    },
}

impl JobKind {
    /// Short, stable name of the kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Work(_) => "work",
            Self::Reconfiguration(_) => "reconfiguration",
            Self::TurnOn => "turn_on",
            Self::TurnOff => "turn_off",
            Self::Frequency { .. } => "frequency",
        }
    }

    /// Whether jobs of this kind may be cut short.
    #[must_use]
    pub const fn is_interruptible(&self) -> bool {
        matches!(self, Self::Work(_) | Self::Reconfiguration(_))
    }

    /// Whether this is a turn-on, turn-off or frequency job.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::TurnOn | Self::TurnOff | Self::Frequency { .. })
    }
}

/// One exported row: a job's occupation of one server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRow {
    /// Job id.
    pub id: JobId,
    /// Job kind name.
    pub kind: &'static str,
    /// Start of the interval.
    pub time_beg: SimTime,
    /// Actual end, unset while the job is not terminal.
    pub time_end_real: Option<SimTime>,
    /// Server occupied.
    pub server_id: usize,
}

/// A time interval on a set of servers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    id: JobId,
    time_beg: SimTime,
    time_end: SimTime,
    time_end_real: Option<SimTime>,
    servers: Vec<ServerId>,
    kind: JobKind,
}

impl Job {
    fn new(
        id: JobId,
        time_beg: SimTime,
        time_end: SimTime,
        servers: Vec<ServerId>,
        kind: JobKind,
    ) -> Result<Self, SimulationError> {
        if !time_beg.is_finite() || !time_end.is_finite() || time_beg >= time_end {
            return Err(SimulationError::InvalidJob {
                id,
                reason: format!("interval [{time_beg}, {time_end}) is empty or not finite"),
            });
        }
        if servers.is_empty() {
            return Err(SimulationError::InvalidJob {
                id,
                reason: "no servers".into(),
            });
        }
        for (i, server) in servers.iter().enumerate() {
            if servers[..i].contains(server) {
                return Err(SimulationError::InvalidJob {
                    id,
                    reason: format!("{server} listed twice"),
                });
            }
        }
        Ok(Self {
            id,
            time_beg,
            time_end,
            time_end_real: None,
            servers,
            kind,
        })
    }

    /// Build a work job starting at `time_beg`.
    ///
    /// Its end is `time_beg + mass / (malleability(|servers|) * frequency_factor(frequency))`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidJob`] if the mass is not positive, the data is
    /// negative, the server count is outside `[min_servers, max_servers]` or
    /// the resulting speed is not positive.
    pub fn new_work(
        id: impl Into<JobId>,
        time_beg: SimTime,
        payload: WorkPayload,
        servers: Vec<ServerId>,
    ) -> Result<Self, SimulationError> {
        let id = id.into();
        let invalid = |reason: String| SimulationError::InvalidJob {
            id: id.clone(),
            reason,
        };
        if !(payload.mass > 0.0 && payload.mass.is_finite()) {
            return Err(invalid(format!("mass {} must be positive", payload.mass)));
        }
        if !(payload.data >= 0.0 && payload.data.is_finite()) {
            return Err(invalid(format!("data {} must be non-negative", payload.data)));
        }
        if !payload.is_executable_on(servers.len()) {
            return Err(invalid(format!(
                "{} servers outside [{}, {}]",
                servers.len(),
                payload.min_servers,
                payload.max_servers
            )));
        }
        let speed = payload.speed(servers.len());
        if !(speed > 0.0 && speed.is_finite()) {
            return Err(invalid(format!("speed {speed} must be positive")));
        }
        let time_end = time_beg + payload.mass / speed;
        Self::new(id, time_beg, time_end, servers, JobKind::Work(payload))
    }

    /// Build the work job executing `request` from `time` on `servers` at `frequency`.
    ///
    /// # Errors
    ///
    /// See [`Job::new_work`].
    pub fn from_request(
        time: SimTime,
        request: &Request,
        servers: Vec<ServerId>,
        frequency: f64,
    ) -> Result<Self, SimulationError> {
        Self::new_work(
            request.id.clone(),
            time,
            WorkPayload::from_request(request, frequency),
            servers,
        )
    }

    /// Build the job moving `source` to `target` servers, starting at `time_beg`.
    ///
    /// The job occupies the union of both server sets.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidJob`] if `source` is not a work job or the
    /// reconfiguration has zero duration.
    pub fn reconfiguration(
        source: &Self,
        target: &[ServerId],
        time_beg: SimTime,
    ) -> Result<Self, SimulationError> {
        let JobKind::Work(work) = &source.kind else {
            return Err(SimulationError::InvalidJob {
                id: source.id.clone(),
                reason: format!("cannot reconfigure a {} job", source.kind.name()),
            });
        };
        let duration = reconfiguration_duration(work.data, source.servers.len(), target.len());
        let mut servers = source.servers.clone();
        servers.extend(target.iter().filter(|s| !source.servers.contains(s)));
        Self::new(
            source.id.clone(),
            time_beg,
            time_beg + duration,
            servers,
            JobKind::Reconfiguration(ReconfigurationPayload {
                source_time_beg: source.time_beg,
                source_servers: source.servers.clone(),
                target_servers: target.to_vec(),
                data: work.data,
            }),
        )
    }

    /// Build a turn-on job for `server`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidJob`] if `time_beg` is not finite.
    pub fn turn_on(time_beg: SimTime, server: ServerId) -> Result<Self, SimulationError> {
        Self::system(time_beg, DURATION_TURN_ON, server, JobKind::TurnOn)
    }

    /// Build a turn-off job for `server`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidJob`] if `time_beg` is not finite.
    pub fn turn_off(time_beg: SimTime, server: ServerId) -> Result<Self, SimulationError> {
        Self::system(time_beg, DURATION_TURN_OFF, server, JobKind::TurnOff)
    }

    /// Build a job switching `server` to `frequency`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidJob`] if `time_beg` is not finite.
    pub fn frequency_change(
        time_beg: SimTime,
        server: ServerId,
        frequency: f64,
    ) -> Result<Self, SimulationError> {
        Self::system(
            time_beg,
            DURATION_FREQUENCY,
            server,
            JobKind::Frequency { frequency },
        )
    }

    fn system(
        time_beg: SimTime,
        duration: SimTime,
        server: ServerId,
        kind: JobKind,
    ) -> Result<Self, SimulationError> {
        Self::new(
            SYSTEM_JOB_ID.to_string(),
            time_beg,
            time_beg + duration,
            vec![server],
            kind,
        )
    }

    /// Job id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Planned start.
    #[must_use]
    pub const fn time_beg(&self) -> SimTime {
        self.time_beg
    }

    /// Planned end.
    #[must_use]
    pub const fn time_end(&self) -> SimTime {
        self.time_end
    }

    /// Actual end, set once the job is terminal.
    #[must_use]
    pub const fn time_end_real(&self) -> Option<SimTime> {
        self.time_end_real
    }

    /// Servers executing the job.
    #[must_use]
    pub fn servers(&self) -> &[ServerId] {
        &self.servers
    }

    /// Per-kind payload.
    #[must_use]
    pub const fn kind(&self) -> &JobKind {
        &self.kind
    }

    /// Work payload, if this is a work job.
    #[must_use]
    pub const fn work(&self) -> Option<&WorkPayload> {
        match &self.kind {
            JobKind::Work(work) => Some(work),
            _ => None,
        }
    }

    /// Whether this is a work job.
    #[must_use]
    pub const fn is_work(&self) -> bool {
        matches!(self.kind, JobKind::Work(_))
    }

    /// Whether the job runs on `server`.
    #[must_use]
    pub fn runs_on(&self, server: ServerId) -> bool {
        self.servers.contains(&server)
    }

    /// Derived status at `time`.
    #[must_use]
    pub fn status(&self, time: SimTime) -> JobStatus {
        if self.is_pending(time) {
            JobStatus::Pending
        } else if self.is_executing(time) {
            JobStatus::Executing
        } else {
            JobStatus::Over
        }
    }

    /// `time < time_beg`.
    #[must_use]
    pub fn is_pending(&self, time: SimTime) -> bool {
        time < self.time_beg
    }

    /// Not terminal and `time_beg <= time < time_end`.
    #[must_use]
    pub fn is_executing(&self, time: SimTime) -> bool {
        self.time_end_real.is_none() && self.time_beg <= time && time < self.time_end
    }

    /// Terminal, or `time >= time_end`.
    #[must_use]
    pub fn is_over(&self, time: SimTime) -> bool {
        self.time_end_real.is_some() || time >= self.time_end
    }

    /// Whether `complete` or `interrupt` already ran.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.time_end_real.is_some()
    }

    /// Terminal with all work done.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.time_end_real == Some(self.time_end)
    }

    /// Terminal before its planned end.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.time_end_real.is_some_and(|end| end < self.time_end)
    }

    /// Whether [`Job::interrupt`] would accept `time`.
    #[must_use]
    pub fn is_interruptible(&self, time: SimTime) -> bool {
        self.kind.is_interruptible()
            && !self.is_terminal()
            && self.time_beg < time
            && time < self.time_end
    }

    /// Interrupt if `time < time_end`, otherwise complete.
    ///
    /// # Errors
    ///
    /// Whatever [`Job::interrupt`] or [`Job::complete`] reject.
    pub fn terminate(&mut self, time: SimTime) -> Result<(), SimulationError> {
        if time < self.time_end {
            self.interrupt(time)
        } else {
            self.complete(time)
        }
    }

    /// Mark the job completed.
    ///
    /// # Errors
    ///
    /// [`SimulationError::AlreadyTerminated`] or, if `time < time_end`,
    /// [`SimulationError::InvalidTransition`].
    pub fn complete(&mut self, time: SimTime) -> Result<(), SimulationError> {
        self.ensure_live()?;
        if time < self.time_end {
            return Err(self.transition_error(time, "completion before planned end"));
        }
        self.time_end_real = Some(self.time_end);
        Ok(())
    }

    /// Mark the job interrupted at `time`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::AlreadyTerminated`], [`SimulationError::NotInterruptible`]
    /// for system jobs, or [`SimulationError::InvalidTransition`] unless
    /// `time_beg < time < time_end`.
    pub fn interrupt(&mut self, time: SimTime) -> Result<(), SimulationError> {
        self.ensure_live()?;
        if !self.kind.is_interruptible() {
            return Err(SimulationError::NotInterruptible {
                id: self.id.clone(),
            });
        }
        if !(self.time_beg < time && time < self.time_end) {
            return Err(self.transition_error(time, "interruption outside the interval"));
        }
        self.time_end_real = Some(time);
        Ok(())
    }

    /// Terminate a job that never started: it ends where it would have begun.
    pub(crate) fn abandon(&mut self, time: SimTime) -> Result<(), SimulationError> {
        self.ensure_live()?;
        if time > self.time_beg {
            return Err(self.transition_error(time, "abandoning a started job"));
        }
        self.time_end_real = Some(self.time_beg);
        Ok(())
    }

    /// Terminate a non-interruptible job that is already running: it runs out.
    pub(crate) fn run_out(&mut self) -> Result<(), SimulationError> {
        self.ensure_live()?;
        self.time_end_real = Some(self.time_end);
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), SimulationError> {
        if self.is_terminal() {
            return Err(SimulationError::AlreadyTerminated {
                id: self.id.clone(),
            });
        }
        Ok(())
    }

    fn transition_error(&self, time: SimTime, reason: &str) -> SimulationError {
        SimulationError::InvalidTransition {
            id: self.id.clone(),
            time,
            reason: format!("{reason} [{}, {})", self.time_beg, self.time_end),
        }
    }

    /// Work left at `time`.
    ///
    /// Full mass while pending, zero once completed, and the unprocessed
    /// share of the interval otherwise (up to `time_end_real` when
    /// interrupted, up to `time` while executing).
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidJob`] if this is not a work job.
    pub fn remaining_mass(&self, time: SimTime) -> Result<f64, SimulationError> {
        let Some(work) = self.work() else {
            return Err(SimulationError::InvalidJob {
                id: self.id.clone(),
                reason: format!("a {} job carries no mass", self.kind.name()),
            });
        };
        if self.is_pending(time) {
            return Ok(work.mass);
        }
        if self.is_completed() {
            return Ok(0.0);
        }
        let processed_until = match self.time_end_real {
            Some(end) => end,
            None => time.min(self.time_end),
        };
        let share = (processed_until - self.time_beg) / (self.time_end - self.time_beg);
        Ok((work.mass * (1.0 - share)).max(0.0))
    }

    /// One row per server for external sinks.
    #[must_use]
    pub fn trace_rows(&self) -> Vec<TraceRow> {
        self.servers
            .iter()
            .map(|server| TraceRow {
                id: self.id.clone(),
                kind: self.kind.name(),
                time_beg: self.time_beg,
                time_end_real: self.time_end_real,
                server_id: server.0,
            })
            .collect()
    }
}
