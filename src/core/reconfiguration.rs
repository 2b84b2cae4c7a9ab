//! Reconfiguration of executing work jobs.
//!
//! A reconfiguration never mutates the source job. It produces a
//! [`Reconfiguration`] plan: the synthetic jobs that model the transition and
//! the continuation that finishes the remaining work. Applying the plan
//! (interrupting the source, attaching the new jobs) is the scheduler's job.
//!
//! Causal order inside a plan: turn-on, server reconfiguration, frequency
//! change, continuation. Turn-off jobs for dropped servers start when the
//! server reconfiguration ends.

use crate::core::{reconfiguration_duration, Job, Server, SimulationError, WorkPayload};
use crate::util::{ServerId, SimTime};

/// Jobs produced by one reconfiguration, in causal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconfiguration {
    /// Power-ups of target servers that were off.
    pub turn_on: Vec<Job>,
    /// Data movement between server sets; absent for frequency-only changes.
    pub reconfiguration: Option<Job>,
    /// Per-server frequency changes.
    pub frequency: Vec<Job>,
    /// Remaining work on the new configuration.
    pub continuation: Job,
    /// Power-downs of dropped servers.
    pub turn_off: Vec<Job>,
}

impl Reconfiguration {
    /// Iterate over every job of the plan in causal order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.turn_on
            .iter()
            .chain(self.reconfiguration.iter())
            .chain(self.frequency.iter())
            .chain(std::iter::once(&self.continuation))
            .chain(self.turn_off.iter())
    }

    /// Consume the plan into its jobs in causal order.
    #[must_use]
    pub fn into_jobs(self) -> Vec<Job> {
        let mut jobs = self.turn_on;
        jobs.extend(self.reconfiguration);
        jobs.extend(self.frequency);
        jobs.push(self.continuation);
        jobs.extend(self.turn_off);
        jobs
    }
}

fn lookup(servers: &[Server], id: ServerId) -> Result<&Server, SimulationError> {
    servers
        .get(id.0)
        .filter(|s| s.id() == id)
        .ok_or(SimulationError::UnknownServer(id))
}

fn latest_end(jobs: &[Job], fallback: SimTime) -> SimTime {
    jobs.iter().map(Job::time_end).fold(fallback, f64::max)
}

impl Job {
    fn not_reconfigurable(&self, reason: impl Into<String>) -> SimulationError {
        SimulationError::NotReconfigurable {
            id: self.id().to_string(),
            reason: reason.into(),
        }
    }

    fn reconfigurable_work(&self, time: SimTime) -> Result<&WorkPayload, SimulationError> {
        let Some(work) = self.work() else {
            return Err(self.not_reconfigurable(format!("{} job", self.kind().name())));
        };
        if !self.is_interruptible(time) {
            return Err(self.not_reconfigurable(format!(
                "not executing past its start at {time} [{}, {})",
                self.time_beg(),
                self.time_end()
            )));
        }
        Ok(work)
    }

    fn check_servers(
        &self,
        time: SimTime,
        servers: &[Server],
        target: &[ServerId],
        turn_on: bool,
    ) -> Result<&WorkPayload, SimulationError> {
        let work = self.reconfigurable_work(time)?;
        for (i, id) in target.iter().enumerate() {
            if target[..i].contains(id) {
                return Err(self.not_reconfigurable(format!("{id} listed twice")));
            }
        }
        if !work.is_executable_on(target.len()) {
            return Err(self.not_reconfigurable(format!(
                "{} servers outside [{}, {}]",
                target.len(),
                work.min_servers,
                work.max_servers
            )));
        }
        if reconfiguration_duration(work.data, self.servers().len(), target.len()) <= 0.0 {
            return Err(self.not_reconfigurable("reconfiguration would take no time"));
        }
        for &id in target.iter().filter(|id| !self.runs_on(**id)) {
            let server = lookup(servers, id)?;
            if server.is_busy(time) {
                return Err(self.not_reconfigurable(format!("{id} is busy")));
            }
            if server.is_turned_off(time) && !turn_on {
                return Err(self.not_reconfigurable(format!("{id} is turned off")));
            }
            if server.get_frequency(time) != work.frequency {
                return Err(self.not_reconfigurable(format!(
                    "{id} does not run at {}",
                    work.frequency
                )));
            }
        }
        Ok(work)
    }

    fn check_frequency(
        &self,
        time: SimTime,
        servers: &[Server],
        on: &[ServerId],
        frequency: f64,
    ) -> Result<&WorkPayload, SimulationError> {
        let work = self.reconfigurable_work(time)?;
        for &id in on {
            if !lookup(servers, id)?.supports_frequency(frequency) {
                return Err(self.not_reconfigurable(format!("{id} does not support {frequency}")));
            }
        }
        Ok(work)
    }

    /// Whether [`Job::reconfigure_servers`] accepts these arguments.
    ///
    /// The job must be an executing work job past its start, the target
    /// count within bounds, and every added server idle, powered (unless
    /// `turn_on`) and already running at the job's frequency. The remaining
    /// mass must also still span a non-empty continuation.
    #[must_use]
    pub fn is_reconfigurable_servers(
        &self,
        time: SimTime,
        servers: &[Server],
        target: &[ServerId],
        turn_on: bool,
    ) -> bool {
        self.reconfigure_servers(time, servers, target, turn_on, false)
            .is_ok()
    }

    /// Whether [`Job::reconfigure_frequency`] accepts these arguments.
    #[must_use]
    pub fn is_reconfigurable_frequency(&self, time: SimTime, servers: &[Server], frequency: f64) -> bool {
        self.reconfigure_frequency(time, servers, frequency).is_ok()
    }

    /// Whether [`Job::reconfigure`] accepts these arguments.
    #[must_use]
    pub fn is_reconfigurable(
        &self,
        time: SimTime,
        servers: &[Server],
        target: &[ServerId],
        frequency: Option<f64>,
        turn_on: bool,
    ) -> bool {
        self.reconfigure(time, servers, target, frequency, turn_on, false)
            .is_ok()
    }

    fn continuation(
        &self,
        time: SimTime,
        time_beg: SimTime,
        work: &WorkPayload,
        frequency: f64,
        target: &[ServerId],
    ) -> Result<Self, SimulationError> {
        let mass = self.remaining_mass(time)?;
        Self::new_work(self.id(), time_beg, work.continued(mass, frequency), target.to_vec())
            .map_err(|e| self.not_reconfigurable(format!("no continuation: {e}")))
    }

    fn turn_on_jobs(
        time: SimTime,
        servers: &[Server],
        target: &[ServerId],
    ) -> Result<Vec<Self>, SimulationError> {
        let mut jobs = Vec::new();
        for &id in target {
            if lookup(servers, id)?.is_turned_off(time) {
                jobs.push(Self::turn_on(time, id)?);
            }
        }
        Ok(jobs)
    }

    fn turn_off_jobs(&self, time_beg: SimTime, target: &[ServerId]) -> Result<Vec<Self>, SimulationError> {
        self.servers()
            .iter()
            .filter(|id| !target.contains(id))
            .map(|&id| Self::turn_off(time_beg, id))
            .collect()
    }

    /// Plan moving the job to `target` servers at `time`.
    ///
    /// With `turn_on`, every target server that is off gets a turn-on job at
    /// `time` and the reconfiguration waits for the slowest one. With
    /// `turn_off`, every dropped server gets a turn-off job starting with
    /// the continuation.
    ///
    /// # Errors
    ///
    /// [`SimulationError::NotReconfigurable`] when the job, the target
    /// servers or the remaining mass do not allow the move.
    pub fn reconfigure_servers(
        &self,
        time: SimTime,
        servers: &[Server],
        target: &[ServerId],
        turn_on: bool,
        turn_off: bool,
    ) -> Result<Reconfiguration, SimulationError> {
        let work = self.check_servers(time, servers, target, turn_on)?;

        let turn_on = if turn_on {
            Self::turn_on_jobs(time, servers, target)?
        } else {
            Vec::new()
        };
        let reconfiguration = Self::reconfiguration(self, target, latest_end(&turn_on, time))?;
        let continuation =
            self.continuation(time, reconfiguration.time_end(), work, work.frequency, target)?;
        let turn_off = if turn_off {
            self.turn_off_jobs(continuation.time_beg(), target)?
        } else {
            Vec::new()
        };

        Ok(Reconfiguration {
            turn_on,
            reconfiguration: Some(reconfiguration),
            frequency: Vec::new(),
            continuation,
            turn_off,
        })
    }

    /// Plan switching the job's servers to `frequency` at `time`.
    ///
    /// Returns `None` when the job already runs at `frequency`. Otherwise
    /// every server changes frequency in parallel from `time` and the
    /// continuation starts once the slowest change is over.
    ///
    /// # Errors
    ///
    /// [`SimulationError::NotReconfigurable`] when the job is not executing,
    /// a server lacks `frequency` or the remaining mass is spent.
    pub fn reconfigure_frequency(
        &self,
        time: SimTime,
        servers: &[Server],
        frequency: f64,
    ) -> Result<Option<Reconfiguration>, SimulationError> {
        let work = self.check_frequency(time, servers, self.servers(), frequency)?;
        if work.frequency == frequency {
            return Ok(None);
        }

        let changes = self
            .servers()
            .iter()
            .map(|&id| Self::frequency_change(time, id, frequency))
            .collect::<Result<Vec<_>, _>>()?;
        let continuation = self.continuation(
            time,
            latest_end(&changes, time),
            work,
            frequency,
            self.servers(),
        )?;

        Ok(Some(Reconfiguration {
            turn_on: Vec::new(),
            reconfiguration: None,
            frequency: changes,
            continuation,
            turn_off: Vec::new(),
        }))
    }

    /// Plan moving the job to `target` servers and `frequency` at `time`.
    ///
    /// Sequence: turn-on (if `turn_on`), server reconfiguration, frequency
    /// change on every target server (only if the frequency changes),
    /// continuation. Turn-off jobs (if `turn_off`) start when the server
    /// reconfiguration ends, alongside the frequency change.
    ///
    /// # Errors
    ///
    /// [`SimulationError::NotReconfigurable`] when either the server move or
    /// the frequency change is refused.
    pub fn reconfigure(
        &self,
        time: SimTime,
        servers: &[Server],
        target: &[ServerId],
        frequency: Option<f64>,
        turn_on: bool,
        turn_off: bool,
    ) -> Result<Reconfiguration, SimulationError> {
        let work = self.check_servers(time, servers, target, turn_on)?;
        let frequency = frequency.unwrap_or(work.frequency);
        self.check_frequency(time, servers, target, frequency)?;

        let turn_on = if turn_on {
            Self::turn_on_jobs(time, servers, target)?
        } else {
            Vec::new()
        };
        let reconfiguration = Self::reconfiguration(self, target, latest_end(&turn_on, time))?;
        let settled = reconfiguration.time_end();
        let changes = if frequency == work.frequency {
            Vec::new()
        } else {
            target
                .iter()
                .map(|&id| Self::frequency_change(settled, id, frequency))
                .collect::<Result<Vec<_>, _>>()?
        };
        let continuation =
            self.continuation(time, latest_end(&changes, settled), work, frequency, target)?;
        let turn_off = if turn_off {
            self.turn_off_jobs(settled, target)?
        } else {
            Vec::new()
        };

        Ok(Reconfiguration {
            turn_on,
            reconfiguration: Some(reconfiguration),
            frequency: changes,
            continuation,
            turn_off,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Request, DURATION_FREQUENCY, DURATION_TURN_ON};

    fn servers(n: usize) -> Vec<Server> {
        (0..n).map(|i| Server::with_defaults(ServerId(i))).collect()
    }

    fn job(data: f64) -> Job {
        let request = Request::new("job0", 0.0, 1000.0)
            .with_data(data)
            .with_server_range(1, 4);
        Job::from_request(0.0, &request, vec![ServerId(0)], 1.0).unwrap()
    }

    #[test]
    fn test_servers_plan_timing() {
        let pool = servers(2);
        let plan = job(100.0)
            .reconfigure_servers(100.0, &pool, &[ServerId(0), ServerId(1)], false, false)
            .unwrap();
        let reconf = plan.reconfiguration.as_ref().unwrap();
        assert_eq!(reconf.time_beg(), 100.0);
        assert_eq!(reconf.time_end(), 200.0);
        assert_eq!(reconf.servers(), &[ServerId(0), ServerId(1)]);
        assert_eq!(plan.continuation.time_beg(), 200.0);
        assert_eq!(plan.continuation.work().unwrap().mass, 900.0);
        assert_eq!(plan.continuation.time_end(), 650.0);
        assert!(plan.turn_on.is_empty());
        assert!(plan.turn_off.is_empty());
        assert_eq!(plan.jobs().count(), 2);
    }

    #[test]
    fn test_turn_off_dropped_servers() {
        let pool = servers(2);
        let request = Request::new("job0", 0.0, 1000.0)
            .with_data(100.0)
            .with_server_range(1, 4);
        let source = Job::from_request(0.0, &request, vec![ServerId(0), ServerId(1)], 1.0).unwrap();
        let plan = source
            .reconfigure_servers(10.0, &pool, &[ServerId(1)], false, true)
            .unwrap();
        assert_eq!(plan.turn_off.len(), 1);
        assert_eq!(plan.turn_off[0].servers(), &[ServerId(0)]);
        assert_eq!(plan.turn_off[0].time_beg(), plan.continuation.time_beg());
    }

    #[test]
    fn test_frequency_plan() {
        let pool = servers(1);
        let source = job(100.0);
        assert!(source.reconfigure_frequency(50.0, &pool, 1.0).unwrap().is_none());

        let plan = source.reconfigure_frequency(50.0, &pool, 3.0).unwrap().unwrap();
        assert_eq!(plan.frequency.len(), 1);
        assert_eq!(plan.continuation.time_beg(), 50.0 + DURATION_FREQUENCY);
        assert_eq!(plan.continuation.work().unwrap().frequency, 3.0);
        assert!(!source.is_reconfigurable_frequency(50.0, &pool, 2.0));
    }

    #[test]
    fn test_combined_plan_sequence() {
        let mut pool = servers(2);
        pool[1] = Server::new(ServerId(1), vec![1.0, 3.0], false, 0).unwrap();
        let plan = job(100.0)
            .reconfigure(10.0, &pool, &[ServerId(0), ServerId(1)], Some(3.0), true, false)
            .unwrap();
        assert_eq!(plan.turn_on.len(), 1);
        let reconf = plan.reconfiguration.as_ref().unwrap();
        assert_eq!(reconf.time_beg(), 10.0 + DURATION_TURN_ON);
        assert_eq!(plan.frequency.len(), 2);
        assert!(plan.frequency.iter().all(|j| j.time_beg() == reconf.time_end()));
        assert_eq!(plan.continuation.time_beg(), reconf.time_end() + DURATION_FREQUENCY);
        assert_eq!(plan.into_jobs().len(), 5);
    }

    #[test]
    fn test_eligibility_rejections() {
        let mut pool = servers(3);
        let source = job(100.0);

        // at its very start the job cannot be interrupted
        assert!(!source.is_reconfigurable_servers(0.0, &pool, &[ServerId(1)], false));
        // past its end
        assert!(!source.is_reconfigurable_servers(5000.0, &pool, &[ServerId(1)], false));
        // out of bounds
        let five: Vec<_> = (0..5).map(ServerId).collect();
        assert!(!source.is_reconfigurable_servers(10.0, &pool, &five, false));
        // unknown server
        assert!(!source.is_reconfigurable_servers(10.0, &pool, &[ServerId(9)], false));
        // no data, no reconfiguration time
        assert!(!job(0.0).is_reconfigurable_servers(10.0, &pool, &[ServerId(1)], false));

        // turned off target
        pool[1] = Server::new(ServerId(1), vec![1.0, 3.0], false, 0).unwrap();
        assert!(!source.is_reconfigurable_servers(10.0, &pool, &[ServerId(1)], false));
        assert!(source.is_reconfigurable_servers(10.0, &pool, &[ServerId(1)], true));

        // target at another frequency
        pool[2] = Server::new(ServerId(2), vec![1.0, 3.0], true, 1).unwrap();
        assert!(!source.is_reconfigurable_servers(10.0, &pool, &[ServerId(2)], false));
        assert!(matches!(
            source.reconfigure_servers(10.0, &pool, &[ServerId(2)], false, false),
            Err(SimulationError::NotReconfigurable { .. })
        ));
    }

    #[test]
    fn test_predicate_refuses_spent_continuation() {
        let pool = servers(2);
        let request = Request::new("job0", 0.0, 1.0e6)
            .with_data(3.0e6)
            .with_server_range(1, 2);
        let source = Job::from_request(0.0, &request, vec![ServerId(0)], 1.0).unwrap();
        let end = source.time_end();
        let time = f64::from_bits(end.to_bits() - 1);
        let target = [ServerId(0), ServerId(1)];

        let eligible = source.is_reconfigurable_servers(time, &pool, &target, false);
        let planned = source.reconfigure_servers(time, &pool, &target, false, false);
        assert!(!eligible);
        assert!(matches!(planned, Err(SimulationError::NotReconfigurable { .. })));
        assert!(!source.is_reconfigurable(time, &pool, &target, None, false));

        // well inside the interval both agree on success
        assert!(source.is_reconfigurable_servers(end / 2.0, &pool, &target, false));
        assert!(source.reconfigure_servers(end / 2.0, &pool, &target, false, false).is_ok());
    }
}
