//! Server entity with event-sourced power and frequency state.
//!
//! A server never stores a "current" on/off flag or frequency. Every system
//! job attached to it is appended to a transition log, and status at any
//! time `t` is a fold over the entries relevant to `t`. Entries outlive the
//! jobs themselves, so queries about the past stay answerable after the
//! scheduler archives a job.

use serde::{Deserialize, Serialize};

use crate::core::{Job, JobKind, SimulationError};
use crate::util::{JobKey, ServerId, SimTime};

/// Frequencies supported by servers built with [`Server::with_defaults`].
pub const DEFAULT_FREQUENCIES: [f64; 2] = [1.0, 3.0];

/// Ranks used for the initial power state when no transition precedes `t`.
/// Real transition times always outrank both.
const INITIAL_STATE_RANK: f64 = f64::MIN;
const NEVER_RANK: f64 = f64::NEG_INFINITY;

/// A job interval currently attached to a server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Arena key of the attached job.
    pub job: JobKey,
    /// Planned start.
    pub time_beg: SimTime,
    /// Planned end.
    pub time_end: SimTime,
}

impl Assignment {
    fn overlaps(&self, time_beg: SimTime, time_end: SimTime) -> bool {
        time_beg < self.time_end && self.time_beg < time_end
    }
}

/// Kind of state change recorded in the transition log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionKind {
    /// Power-up.
    TurnOn,
    /// Power-down.
    TurnOff,
    /// Frequency switch.
    Frequency {
        /// Target frequency.
        frequency: f64,
    },
}

/// One entry of the transition log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Start of the system job.
    pub time_beg: SimTime,
    /// End of the system job.
    pub time_end: SimTime,
    /// What changes.
    pub kind: TransitionKind,
}

/// A compute server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    id: ServerId,
    frequencies: Vec<f64>,
    begin_on: bool,
    begin_frequency: f64,
    /// Sorted by start time, pairwise disjoint.
    assignments: Vec<Assignment>,
    /// Sorted by start time; never shrinks.
    transitions: Vec<Transition>,
}

impl Server {
    /// Create a server supporting `frequencies`, starting powered on or off at
    /// `frequencies[begin_frequency_index]` once sorted ascending.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidServer`] if no frequency is given, one is not
    /// a positive finite number, or the index is out of range.
    pub fn new(
        id: ServerId,
        mut frequencies: Vec<f64>,
        begin_on: bool,
        begin_frequency_index: usize,
    ) -> Result<Self, SimulationError> {
        if frequencies.is_empty() {
            return Err(SimulationError::InvalidServer(format!("{id} has no frequency")));
        }
        if let Some(bad) = frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
            return Err(SimulationError::InvalidServer(format!(
                "{id} frequency {bad} must be positive"
            )));
        }
        frequencies.sort_by(f64::total_cmp);
        frequencies.dedup();
        let Some(&begin_frequency) = frequencies.get(begin_frequency_index) else {
            return Err(SimulationError::InvalidServer(format!(
                "{id} initial frequency index {begin_frequency_index} out of range"
            )));
        };
        Ok(Self {
            id,
            frequencies,
            begin_on,
            begin_frequency,
            assignments: Vec::new(),
            transitions: Vec::new(),
        })
    }

    /// A powered-on server supporting [`DEFAULT_FREQUENCIES`], at the lowest one.
    #[must_use]
    pub fn with_defaults(id: ServerId) -> Self {
        Self {
            id,
            frequencies: DEFAULT_FREQUENCIES.to_vec(),
            begin_on: true,
            begin_frequency: DEFAULT_FREQUENCIES[0],
            assignments: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Server id.
    #[must_use]
    pub const fn id(&self) -> ServerId {
        self.id
    }

    /// Supported frequencies, ascending.
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Whether `frequency` is supported.
    #[must_use]
    pub fn supports_frequency(&self, frequency: f64) -> bool {
        self.frequencies.contains(&frequency)
    }

    /// Lowest supported frequency.
    #[must_use]
    pub fn min_frequency(&self) -> f64 {
        self.frequencies[0]
    }

    /// Highest supported frequency.
    #[must_use]
    pub fn max_frequency(&self) -> f64 {
        self.frequencies[self.frequencies.len() - 1]
    }

    /// Jobs currently attached, sorted by start time.
    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Every power and frequency transition ever attached.
    #[must_use]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Frequency in effect at `time`: the target of the latest frequency job
    /// over by `time`, else the initial frequency.
    #[must_use]
    pub fn get_frequency(&self, time: SimTime) -> f64 {
        self.transitions
            .iter()
            .rev()
            .find_map(|t| match t.kind {
                TransitionKind::Frequency { frequency } if time >= t.time_end => Some(frequency),
                _ => None,
            })
            .unwrap_or(self.begin_frequency)
    }

    /// Start of the latest turn-on job started at or before `time`.
    #[must_use]
    pub fn time_turn_on(&self, time: SimTime) -> Option<SimTime> {
        self.latest_start(time, |kind| matches!(kind, TransitionKind::TurnOn))
    }

    /// Start of the latest turn-off job started at or before `time`.
    #[must_use]
    pub fn time_turn_off(&self, time: SimTime) -> Option<SimTime> {
        self.latest_start(time, |kind| matches!(kind, TransitionKind::TurnOff))
    }

    fn latest_start(&self, time: SimTime, select: impl Fn(&TransitionKind) -> bool) -> Option<SimTime> {
        self.transitions
            .iter()
            .rev()
            .find(|t| select(&t.kind) && t.time_beg <= time)
            .map(|t| t.time_beg)
    }

    fn power_ranks(&self, time: SimTime) -> (f64, f64) {
        let (on_default, off_default) = if self.begin_on {
            (INITIAL_STATE_RANK, NEVER_RANK)
        } else {
            (NEVER_RANK, INITIAL_STATE_RANK)
        };
        (
            self.time_turn_on(time).unwrap_or(on_default),
            self.time_turn_off(time).unwrap_or(off_default),
        )
    }

    /// Whether the latest power transition started by `time` is a turn-on.
    #[must_use]
    pub fn is_turned_on(&self, time: SimTime) -> bool {
        let (on, off) = self.power_ranks(time);
        on > off
    }

    /// Whether the latest power transition started by `time` is a turn-off.
    #[must_use]
    pub fn is_turned_off(&self, time: SimTime) -> bool {
        let (on, off) = self.power_ranks(time);
        on < off
    }

    /// Whether some attached job is not over at `time`.
    #[must_use]
    pub fn is_busy(&self, time: SimTime) -> bool {
        self.assignments.iter().any(|a| time < a.time_end)
    }

    /// Turned on and idle.
    #[must_use]
    pub fn is_available(&self, time: SimTime) -> bool {
        self.is_turned_on(time) && !self.is_busy(time)
    }

    /// A turned-off server can be turned on.
    #[must_use]
    pub fn is_turnable_on(&self, time: SimTime) -> bool {
        self.is_turned_off(time)
    }

    /// A turned-on server with nothing attached can be turned off.
    #[must_use]
    pub fn is_turnable_off(&self, time: SimTime) -> bool {
        self.is_turned_on(time) && self.assignments.is_empty()
    }

    /// Whether a frequency job to `frequency` may start at `time`.
    #[must_use]
    pub fn is_frequency_settable(&self, time: SimTime, frequency: f64) -> bool {
        !self.is_turned_off(time) && !self.is_busy(time) && self.supports_frequency(frequency)
    }

    /// Check that `job` fits the timeline, ignoring the assignment of `ignoring`.
    pub(crate) fn check_free(&self, job: &Job, ignoring: Option<JobKey>) -> Result<(), SimulationError> {
        let collides = self
            .assignments
            .iter()
            .filter(|a| Some(a.job) != ignoring)
            .any(|a| a.overlaps(job.time_beg(), job.time_end()));
        if collides {
            return Err(SimulationError::Overlap {
                server: self.id,
                job: job.id().to_string(),
            });
        }
        Ok(())
    }

    /// Attach `job` under `key`, keeping the timeline sorted and disjoint.
    pub(crate) fn attach(&mut self, key: JobKey, job: &Job) -> Result<(), SimulationError> {
        self.check_free(job, None)?;
        let assignment = Assignment {
            job: key,
            time_beg: job.time_beg(),
            time_end: job.time_end(),
        };
        let at = self
            .assignments
            .partition_point(|a| a.time_beg <= assignment.time_beg);
        self.assignments.insert(at, assignment);

        let kind = match job.kind() {
            JobKind::TurnOn => Some(TransitionKind::TurnOn),
            JobKind::TurnOff => Some(TransitionKind::TurnOff),
            JobKind::Frequency { frequency } => Some(TransitionKind::Frequency {
                frequency: *frequency,
            }),
            JobKind::Work(_) | JobKind::Reconfiguration(_) => None,
        };
        if let Some(kind) = kind {
            let transition = Transition {
                time_beg: job.time_beg(),
                time_end: job.time_end(),
                kind,
            };
            let at = self
                .transitions
                .partition_point(|t| t.time_beg <= transition.time_beg);
            self.transitions.insert(at, transition);
        }
        Ok(())
    }

    /// Detach the job stored under `key`.
    pub(crate) fn detach(&mut self, key: JobKey) -> Result<(), SimulationError> {
        let Some(at) = self.assignments.iter().position(|a| a.job == key) else {
            return Err(SimulationError::JobNotActive(key));
        };
        self.assignments.remove(at);
        Ok(())
    }
}
