//! Scheduler core: servers, request queue and the job arena.
//!
//! Jobs live in an append-only arena and are referenced by [`JobKey`];
//! servers reference the jobs they execute by key. Every mutating primitive
//! validates before it mutates, so an `Err` leaves the scheduler untouched.

use std::collections::{BTreeMap, VecDeque};

use crate::core::{Job, Reconfiguration, Request, Server, SimulationError, TraceRow};
use crate::util::{JobId, JobKey, ServerId, SimTime, SYSTEM_JOB_ID};

/// Bookkeeping shared by every policy.
#[derive(Debug, Clone)]
pub struct Scheduler {
    servers: Vec<Server>,
    /// Ascending by submission time, insertion order on ties.
    request_queue: VecDeque<Request>,
    jobs: Vec<Job>,
    active_jobs: Vec<JobKey>,
    completed_jobs: BTreeMap<JobId, Vec<JobKey>>,
    next_departure: Option<SimTime>,
}

impl Scheduler {
    /// Scheduler over `server_count` default servers.
    #[must_use]
    pub fn new(server_count: usize) -> Self {
        Self::from_servers((0..server_count).map(|i| Server::with_defaults(ServerId(i))).collect())
    }

    /// Scheduler over explicitly configured servers.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidServer`] unless server `i` has id `ServerId(i)`.
    pub fn with_servers(servers: Vec<Server>) -> Result<Self, SimulationError> {
        if let Some((i, server)) = servers.iter().enumerate().find(|(i, s)| s.id() != ServerId(*i)) {
            return Err(SimulationError::InvalidServer(format!(
                "{} registered at position {i}",
                server.id()
            )));
        }
        Ok(Self::from_servers(servers))
    }

    fn from_servers(servers: Vec<Server>) -> Self {
        let mut completed_jobs = BTreeMap::new();
        completed_jobs.insert(SYSTEM_JOB_ID.to_string(), Vec::new());
        Self {
            servers,
            request_queue: VecDeque::new(),
            jobs: Vec::new(),
            active_jobs: Vec::new(),
            completed_jobs,
            next_departure: None,
        }
    }

    // ---- registry access ----

    /// Every server, indexed by id.
    #[must_use]
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Look up a server.
    ///
    /// # Errors
    ///
    /// [`SimulationError::UnknownServer`] if the id is not registered.
    pub fn server(&self, id: ServerId) -> Result<&Server, SimulationError> {
        self.servers.get(id.0).ok_or(SimulationError::UnknownServer(id))
    }

    /// Look up a job in the arena, active or archived.
    #[must_use]
    pub fn job(&self, key: JobKey) -> Option<&Job> {
        self.jobs.get(key.0)
    }

    /// Keys of the active jobs, in insertion order.
    #[must_use]
    pub fn active_jobs(&self) -> &[JobKey] {
        &self.active_jobs
    }

    /// Active jobs with their keys.
    pub fn active(&self) -> impl Iterator<Item = (JobKey, &Job)> + '_ {
        self.active_jobs.iter().map(|&k| (k, &self.jobs[k.0]))
    }

    /// Archived jobs grouped by id. `"SYSTEM"` and every scheduled request
    /// id have an entry, possibly empty.
    #[must_use]
    pub const fn completed_jobs(&self) -> &BTreeMap<JobId, Vec<JobKey>> {
        &self.completed_jobs
    }

    /// Archived jobs carrying `id`, in archiving order.
    pub fn completed(&self, id: &str) -> impl Iterator<Item = &Job> + '_ {
        self.completed_jobs
            .get(id)
            .into_iter()
            .flatten()
            .map(|k| &self.jobs[k.0])
    }

    /// Export rows for every archived job, grouped by id.
    #[must_use]
    pub fn trace_rows(&self) -> Vec<TraceRow> {
        self.completed_jobs
            .values()
            .flatten()
            .flat_map(|k| self.jobs[k.0].trace_rows())
            .collect()
    }

    /// Earliest planned end among active jobs.
    #[must_use]
    pub const fn next_departure(&self) -> Option<SimTime> {
        self.next_departure
    }

    /// Requests remain queued or jobs remain active.
    #[must_use]
    pub fn is_working(&self) -> bool {
        !self.request_queue.is_empty() || !self.active_jobs.is_empty()
    }

    // ---- request queue ----

    /// Queue `request`, after every queued request submitted at or before it.
    pub fn schedule(&mut self, request: Request) {
        let at = self
            .request_queue
            .partition_point(|r| r.submission_time <= request.submission_time);
        self.completed_jobs.entry(request.id.clone()).or_default();
        tracing::debug!("request {} queued at position {}", request.id, at);
        self.request_queue.insert(at, request);
    }

    /// Queued requests, earliest first.
    #[must_use]
    pub const fn request_queue(&self) -> &VecDeque<Request> {
        &self.request_queue
    }

    /// Head of the queue.
    #[must_use]
    pub fn peek_request(&self) -> Option<&Request> {
        self.request_queue.front()
    }

    /// Take the head of the queue.
    pub fn pop_request(&mut self) -> Option<Request> {
        self.request_queue.pop_front()
    }

    // ---- job primitives ----

    fn check_placement(&self, job: &Job, ignoring: Option<JobKey>) -> Result<(), SimulationError> {
        for &id in job.servers() {
            self.server(id)?.check_free(job, ignoring)?;
        }
        Ok(())
    }

    /// Attach `job` to its servers and make it active.
    ///
    /// # Errors
    ///
    /// [`SimulationError::UnknownServer`] or [`SimulationError::Overlap`];
    /// nothing is attached in that case.
    pub fn add_job(&mut self, job: Job) -> Result<JobKey, SimulationError> {
        self.check_placement(&job, None)?;
        let key = JobKey(self.jobs.len());
        for &id in job.servers() {
            self.servers[id.0].attach(key, &job)?;
        }
        tracing::debug!(
            "job {} {} added as {} on {:?} [{}, {})",
            job.id(),
            job.kind().name(),
            key,
            job.servers(),
            job.time_beg(),
            job.time_end()
        );
        self.next_departure = Some(
            self.next_departure
                .map_or(job.time_end(), |d| d.min(job.time_end())),
        );
        self.jobs.push(job);
        self.active_jobs.push(key);
        Ok(key)
    }

    fn active_position(&self, key: JobKey) -> Result<usize, SimulationError> {
        self.active_jobs
            .iter()
            .position(|&k| k == key)
            .ok_or(SimulationError::JobNotActive(key))
    }

    /// Terminate the job, detach it and archive it under its id.
    ///
    /// # Errors
    ///
    /// [`SimulationError::JobNotActive`] or whatever [`Job::terminate`]
    /// rejects; the scheduler is unchanged in that case.
    pub fn remove_job(&mut self, time: SimTime, key: JobKey) -> Result<(), SimulationError> {
        let at = self.active_position(key)?;
        self.jobs[key.0].terminate(time)?;
        self.archive(at, key)
    }

    fn archive(&mut self, at: usize, key: JobKey) -> Result<(), SimulationError> {
        let job = &self.jobs[key.0];
        for &id in job.servers() {
            self.servers[id.0].detach(key)?;
        }
        tracing::debug!(
            "job {} {} archived, ended at {:?}",
            job.id(),
            job.kind().name(),
            job.time_end_real()
        );
        self.completed_jobs
            .entry(job.id().to_string())
            .or_default()
            .push(key);
        self.active_jobs.remove(at);
        self.refresh_next_departure();
        Ok(())
    }

    fn refresh_next_departure(&mut self) {
        self.next_departure = self
            .active_jobs
            .iter()
            .map(|k| self.jobs[k.0].time_end())
            .reduce(f64::min);
    }

    /// End the run at `time`.
    ///
    /// Drops the queued requests and retires every active job: over jobs
    /// complete, interruptible jobs inside their interval are interrupted,
    /// jobs that have not started are abandoned and running system jobs run
    /// out.
    ///
    /// # Errors
    ///
    /// Only on a corrupted arena; the run must be aborted then.
    pub fn stop(&mut self, time: SimTime) -> Result<(), SimulationError> {
        let dropped = self.request_queue.len();
        self.request_queue.clear();
        while let Some(&key) = self.active_jobs.last() {
            let job = &mut self.jobs[key.0];
            if job.is_over(time) {
                job.complete(time)?;
            } else if job.is_interruptible(time) {
                job.interrupt(time)?;
            } else if time <= job.time_beg() {
                job.abandon(time)?;
            } else {
                job.run_out()?;
            }
            self.archive(self.active_jobs.len() - 1, key)?;
        }
        self.next_departure = None;
        tracing::debug!("scheduler stopped at {}, {} requests dropped", time, dropped);
        Ok(())
    }

    // ---- server queries ----

    fn select(&self, keep: impl Fn(&Server) -> bool) -> Vec<ServerId> {
        self.servers
            .iter()
            .filter(|s| keep(s))
            .map(Server::id)
            .collect()
    }

    /// Servers powered on at `time`.
    #[must_use]
    pub fn servers_turned_on(&self, time: SimTime) -> Vec<ServerId> {
        self.select(|s| s.is_turned_on(time))
    }

    /// Servers powered off at `time`.
    #[must_use]
    pub fn servers_turned_off(&self, time: SimTime) -> Vec<ServerId> {
        self.select(|s| s.is_turned_off(time))
    }

    /// Servers with an attached job not over at `time`.
    #[must_use]
    pub fn servers_busy(&self, time: SimTime) -> Vec<ServerId> {
        self.select(|s| s.is_busy(time))
    }

    /// Servers powered on and idle at `time`.
    #[must_use]
    pub fn servers_available(&self, time: SimTime) -> Vec<ServerId> {
        self.select(|s| s.is_available(time))
    }

    /// Every listed server exists and can be turned on at `time`.
    #[must_use]
    pub fn are_servers_turnable_on(&self, time: SimTime, servers: &[ServerId]) -> bool {
        servers
            .iter()
            .all(|&id| self.server(id).is_ok_and(|s| s.is_turnable_on(time)))
    }

    /// Every listed server exists and can be turned off at `time`.
    #[must_use]
    pub fn are_servers_turnable_off(&self, time: SimTime, servers: &[ServerId]) -> bool {
        servers
            .iter()
            .all(|&id| self.server(id).is_ok_and(|s| s.is_turnable_off(time)))
    }

    /// The `count` lowest ids among `candidates`, or `None` if too few.
    #[must_use]
    pub fn sample_servers(count: usize, candidates: &[ServerId]) -> Option<Vec<ServerId>> {
        if candidates.len() < count {
            return None;
        }
        let mut picked = candidates.to_vec();
        picked.sort_unstable();
        picked.dedup();
        picked.truncate(count);
        (picked.len() == count).then_some(picked)
    }

    // ---- server operations ----

    fn invalid_operation(server: ServerId, reason: impl Into<String>) -> SimulationError {
        SimulationError::InvalidServerOperation {
            server,
            reason: reason.into(),
        }
    }

    fn add_all(&mut self, jobs: Vec<Job>) -> Result<Vec<JobKey>, SimulationError> {
        check_disjoint(&jobs)?;
        for job in &jobs {
            self.check_placement(job, None)?;
        }
        jobs.into_iter().map(|job| self.add_job(job)).collect()
    }

    /// Start a turn-on job at `time` on each listed server.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidServerOperation`] unless every server is
    /// off at `time`; nothing is added in that case.
    pub fn turn_on_servers(
        &mut self,
        time: SimTime,
        servers: &[ServerId],
    ) -> Result<Vec<JobKey>, SimulationError> {
        let mut jobs = Vec::with_capacity(servers.len());
        for &id in servers {
            if !self.server(id)?.is_turnable_on(time) {
                return Err(Self::invalid_operation(id, "turn-on of a server that is not off"));
            }
            jobs.push(Job::turn_on(time, id)?);
        }
        let keys = self.add_all(jobs)?;
        tracing::info!("turning on {:?} at {}", servers, time);
        Ok(keys)
    }

    /// Start a turn-off job at `time` on each listed server.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidServerOperation`] unless every server is on
    /// with nothing attached; nothing is added in that case.
    pub fn turn_off_servers(
        &mut self,
        time: SimTime,
        servers: &[ServerId],
    ) -> Result<Vec<JobKey>, SimulationError> {
        let mut jobs = Vec::with_capacity(servers.len());
        for &id in servers {
            if !self.server(id)?.is_turnable_off(time) {
                return Err(Self::invalid_operation(id, "turn-off of a server that is off or assigned"));
            }
            jobs.push(Job::turn_off(time, id)?);
        }
        let keys = self.add_all(jobs)?;
        tracing::info!("turning off {:?} at {}", servers, time);
        Ok(keys)
    }

    /// Switch the listed servers to `frequency` from `time`.
    ///
    /// Servers already at `frequency` get no job.
    ///
    /// # Errors
    ///
    /// [`SimulationError::InvalidServerOperation`] unless every server that
    /// changes is on, idle and supports `frequency`.
    pub fn set_servers_frequency(
        &mut self,
        time: SimTime,
        frequency: f64,
        servers: &[ServerId],
    ) -> Result<Vec<JobKey>, SimulationError> {
        let mut jobs = Vec::new();
        for &id in servers {
            let server = self.server(id)?;
            if server.get_frequency(time) == frequency {
                continue;
            }
            if !server.is_frequency_settable(time, frequency) {
                return Err(Self::invalid_operation(
                    id,
                    format!("cannot switch to frequency {frequency}"),
                ));
            }
            jobs.push(Job::frequency_change(time, id, frequency)?);
        }
        self.add_all(jobs)
    }

    // ---- reconfiguration ----

    /// Reconfigure the active job `key` at `time`.
    ///
    /// `servers: None` keeps the current server set and `frequency: None`
    /// keeps the current frequency. Returns the keys of the added jobs, in
    /// causal order, or nothing when the request changes nothing.
    ///
    /// # Errors
    ///
    /// [`SimulationError::JobNotActive`], [`SimulationError::NotReconfigurable`]
    /// or [`SimulationError::Overlap`]; the scheduler is unchanged then.
    pub fn reconfigure_job(
        &mut self,
        time: SimTime,
        key: JobKey,
        servers: Option<&[ServerId]>,
        frequency: Option<f64>,
        turn_on: bool,
        turn_off: bool,
    ) -> Result<Vec<JobKey>, SimulationError> {
        self.active_position(key)?;
        let source = &self.jobs[key.0];
        let plan = match (servers, frequency) {
            (None, None) => None,
            (None, Some(f)) => source.reconfigure_frequency(time, &self.servers, f)?,
            (Some(target), None) => {
                Some(source.reconfigure_servers(time, &self.servers, target, turn_on, turn_off)?)
            }
            (Some(target), f) => {
                Some(source.reconfigure(time, &self.servers, target, f, turn_on, turn_off)?)
            }
        };
        match plan {
            Some(plan) => self.apply_reconfiguration(time, key, plan),
            None => Ok(Vec::new()),
        }
    }

    /// Interrupt the active job `key` at `time` and add every job of `plan`.
    ///
    /// # Errors
    ///
    /// [`SimulationError::JobNotActive`], [`SimulationError::NotReconfigurable`]
    /// when the plan does not continue `key`, or [`SimulationError::Overlap`]
    /// when a plan job collides with another assignment; the scheduler is
    /// unchanged then.
    pub fn apply_reconfiguration(
        &mut self,
        time: SimTime,
        key: JobKey,
        plan: Reconfiguration,
    ) -> Result<Vec<JobKey>, SimulationError> {
        let at = self.active_position(key)?;
        let source = &self.jobs[key.0];
        if plan.continuation.id() != source.id() || !source.is_interruptible(time) {
            return Err(SimulationError::NotReconfigurable {
                id: source.id().to_string(),
                reason: format!("plan does not continue {key} at {time}"),
            });
        }
        let jobs = plan.into_jobs();
        check_disjoint(&jobs)?;
        for job in &jobs {
            self.check_placement(job, Some(key))?;
        }

        tracing::info!(
            "reconfiguring job {} at {}: {} servers -> {:?}",
            source.id(),
            time,
            source.servers().len(),
            jobs.last().map(Job::servers)
        );
        self.jobs[key.0].interrupt(time)?;
        self.archive(at, key)?;
        jobs.into_iter().map(|job| self.add_job(job)).collect()
    }
}

/// Reject two jobs of one batch sharing a server over overlapping intervals.
fn check_disjoint(jobs: &[Job]) -> Result<(), SimulationError> {
    for (i, job) in jobs.iter().enumerate() {
        for other in &jobs[..i] {
            let overlaps = job.time_beg() < other.time_end() && other.time_beg() < job.time_end();
            if let Some(&server) = job.servers().iter().find(|s| overlaps && other.runs_on(**s)) {
                return Err(SimulationError::Overlap {
                    server,
                    job: job.id().to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DURATION_TURN_OFF;

    fn request(id: &str, t: SimTime, mass: f64) -> Request {
        Request::new(id, t, mass)
    }

    fn start(s: &mut Scheduler, r: &Request, time: SimTime, servers: Vec<ServerId>) -> JobKey {
        s.add_job(Job::from_request(time, r, servers, 1.0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_schedule_keeps_order_and_ties() {
        let mut s = Scheduler::new(1);
        s.schedule(request("b", 5.0, 1.0));
        s.schedule(request("a", 1.0, 1.0));
        s.schedule(request("c", 5.0, 1.0));
        s.schedule(request("d", 3.0, 1.0));
        let ids: Vec<_> = s.request_queue().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d", "b", "c"]);
        assert!(s.completed_jobs().contains_key("c"));
        assert!(s.completed_jobs().contains_key(SYSTEM_JOB_ID));
        assert!(s.is_working());
    }

    #[test]
    fn test_add_remove_tracks_next_departure() {
        let mut s = Scheduler::new(2);
        assert_eq!(s.next_departure(), None);
        let a = start(&mut s, &request("a", 0.0, 100.0), 0.0, vec![ServerId(0)]);
        let b = start(&mut s, &request("b", 0.0, 50.0), 0.0, vec![ServerId(1)]);
        assert_eq!(s.next_departure(), Some(50.0));

        s.remove_job(50.0, b).unwrap();
        assert_eq!(s.next_departure(), Some(100.0));
        assert!(s.job(b).unwrap().is_completed());

        s.remove_job(60.0, a).unwrap();
        assert_eq!(s.next_departure(), None);
        assert!(s.job(a).unwrap().is_interrupted());
        assert!(!s.is_working());
        assert_eq!(s.completed("a").count(), 1);
    }

    #[test]
    fn test_add_job_atomic_on_overlap() {
        let mut s = Scheduler::new(2);
        start(&mut s, &request("a", 0.0, 100.0), 0.0, vec![ServerId(1)]);
        let r = request("b", 0.0, 100.0).with_server_range(2, 2);
        let clash = Job::from_request(10.0, &r, vec![ServerId(0), ServerId(1)], 1.0).unwrap();
        assert!(matches!(s.add_job(clash), Err(SimulationError::Overlap { .. })));
        assert!(s.server(ServerId(0)).unwrap().assignments().is_empty());
        assert_eq!(s.active_jobs().len(), 1);

        let unknown = Job::from_request(0.0, &request("c", 0.0, 1.0), vec![ServerId(7)], 1.0).unwrap();
        assert!(matches!(
            s.add_job(unknown),
            Err(SimulationError::UnknownServer(ServerId(7)))
        ));
    }

    #[test]
    fn test_remove_unknown_job() {
        let mut s = Scheduler::new(1);
        let a = start(&mut s, &request("a", 0.0, 10.0), 0.0, vec![ServerId(0)]);
        s.remove_job(10.0, a).unwrap();
        assert!(matches!(s.remove_job(10.0, a), Err(SimulationError::JobNotActive(_))));
    }

    #[test]
    fn test_stop_retires_everything() {
        let mut s = Scheduler::new(4);
        s.schedule(request("queued", 0.0, 1.0));
        let running = start(&mut s, &request("r", 0.0, 100.0), 0.0, vec![ServerId(0)]);
        let future = start(&mut s, &request("f", 0.0, 100.0), 80.0, vec![ServerId(1)]);
        let done = start(&mut s, &request("d", 0.0, 10.0), 0.0, vec![ServerId(2)]);
        let off = s.turn_off_servers(20.0, &[ServerId(2)]);
        assert!(off.is_err());
        let powering_down = s.turn_off_servers(30.0, &[ServerId(3)]).unwrap()[0];

        s.stop(50.0).unwrap();
        assert!(!s.is_working());
        assert_eq!(s.next_departure(), None);
        assert!(s.job(running).unwrap().is_interrupted());
        assert_eq!(s.job(future).unwrap().time_end_real(), Some(80.0));
        assert!(s.job(done).unwrap().is_completed());
        let system = s.job(powering_down).unwrap();
        assert_eq!(system.time_end_real(), Some(30.0 + DURATION_TURN_OFF));
        assert!(system.is_completed());
        assert_eq!(s.completed(SYSTEM_JOB_ID).count(), 1);
        assert!(s.servers().iter().all(|sv| sv.assignments().is_empty()));
    }

    #[test]
    fn test_power_cycle_servers() {
        let mut s = Scheduler::new(2);
        assert!(s.are_servers_turnable_off(0.0, &[ServerId(0), ServerId(1)]));
        let keys = s.turn_off_servers(0.0, &[ServerId(0)]).unwrap();
        assert_eq!(s.servers_turned_off(0.0), vec![ServerId(0)]);
        assert_eq!(s.servers_available(0.0), vec![ServerId(1)]);
        assert!(s.turn_on_servers(100.0, &[ServerId(0)]).is_err());

        s.remove_job(500.0, keys[0]).unwrap();
        assert!(s.are_servers_turnable_on(500.0, &[ServerId(0)]));
        s.turn_on_servers(500.0, &[ServerId(0)]).unwrap();
        assert_eq!(s.servers_busy(600.0), vec![ServerId(0)]);
        assert!(s.servers_available(750.0).contains(&ServerId(0)));
        assert_eq!(s.completed(SYSTEM_JOB_ID).count(), 1);
    }

    #[test]
    fn test_set_servers_frequency() {
        let mut s = Scheduler::new(2);
        assert!(s.set_servers_frequency(0.0, 1.0, &[ServerId(0)]).unwrap().is_empty());
        let keys = s.set_servers_frequency(0.0, 3.0, &[ServerId(0), ServerId(1)]).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(s.server(ServerId(1)).unwrap().get_frequency(10.0), 3.0);
        assert!(s.set_servers_frequency(20.0, 2.0, &[ServerId(0)]).is_err());
    }

    #[test]
    fn test_sample_servers_lowest_first() {
        let picked = Scheduler::sample_servers(2, &[ServerId(4), ServerId(1), ServerId(3)]);
        assert_eq!(picked, Some(vec![ServerId(1), ServerId(3)]));
        assert_eq!(Scheduler::sample_servers(3, &[ServerId(0)]), None);
    }

    #[test]
    fn test_reconfigure_job_applies_plan() {
        let mut s = Scheduler::new(2);
        let r = request("a", 0.0, 1000.0)
            .with_data(100.0)
            .with_server_range(1, 2);
        let key = start(&mut s, &r, 0.0, vec![ServerId(0)]);
        let added = s
            .reconfigure_job(100.0, key, Some(&[ServerId(0), ServerId(1)]), None, false, false)
            .unwrap();
        assert_eq!(added.len(), 2);
        assert!(s.job(key).unwrap().is_interrupted());
        let cont = s.job(added[1]).unwrap();
        assert_eq!(cont.time_beg(), 200.0);
        assert_eq!(cont.servers().len(), 2);
        assert_eq!(s.next_departure(), Some(200.0));

        // unchanged frequency is a no-op
        assert!(s.reconfigure_job(300.0, added[1], None, Some(1.0), false, false).unwrap().is_empty());
    }

    #[test]
    fn test_reconfigure_job_rejected_atomically() {
        let mut s = Scheduler::new(2);
        let r = request("a", 0.0, 1000.0).with_data(100.0).with_server_range(1, 2);
        let key = start(&mut s, &r, 0.0, vec![ServerId(0)]);
        start(&mut s, &request("b", 0.0, 50.0), 0.0, vec![ServerId(1)]);
        let result = s.reconfigure_job(10.0, key, Some(&[ServerId(0), ServerId(1)]), None, false, false);
        assert!(matches!(result, Err(SimulationError::NotReconfigurable { .. })));
        assert!(!s.job(key).unwrap().is_terminal());
        assert_eq!(s.active_jobs().len(), 2);
    }

    #[test]
    fn test_with_servers_checks_ids() {
        let servers = vec![Server::with_defaults(ServerId(1))];
        assert!(Scheduler::with_servers(servers).is_err());
        assert!(Scheduler::with_servers(vec![Server::with_defaults(ServerId(0))]).is_ok());
    }
}
