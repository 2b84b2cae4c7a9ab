//! End-to-end scenarios for the core timing calculus.

use malleable_sim::core::{Job, JobKind, Request, Scheduler, Server, SimulationError, DURATION_TURN_ON};
use malleable_sim::policies::Fifo;
use malleable_sim::runtime::{Driver, DriverConfig};
use malleable_sim::util::{ServerId, SYSTEM_JOB_ID};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn malleable(data: f64) -> Request {
    Request::new("job0", 0.0, 1000.0)
        .with_data(data)
        .with_server_range(1, 4)
}

#[test]
fn test_single_job_on_single_server() {
    let request = Request::new("job0", 0.0, 100.0);
    let driver = Driver::new(
        DriverConfig::default(),
        Scheduler::new(1),
        Box::new(Fifo),
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    let outcome = driver.run(vec![request]).unwrap();

    let jobs: Vec<&Job> = outcome.scheduler.completed("job0").collect();
    assert_eq!(jobs.len(), 1);
    assert!(matches!(jobs[0].kind(), JobKind::Work(_)));
    assert_eq!(jobs[0].time_beg(), 0.0);
    assert_eq!(jobs[0].time_end(), 100.0);
    assert!(jobs[0].is_completed());
    assert_eq!(outcome.scheduler.completed(SYSTEM_JOB_ID).count(), 0);
}

#[test]
fn test_grow_from_one_to_two_servers() {
    let t = 40.0;
    let mut s = Scheduler::new(2);
    let source = Job::from_request(0.0, &malleable(100.0), vec![ServerId(0)], 1.0).unwrap();
    let remaining = source.remaining_mass(t).unwrap();
    let key = s.add_job(source).unwrap();

    let added = s
        .reconfigure_job(t, key, Some(&[ServerId(0), ServerId(1)]), None, false, false)
        .unwrap();
    assert_eq!(added.len(), 2);

    // data / max(1, 2) * floor(2 / 1)
    let reconf = s.job(added[0]).unwrap();
    assert!(matches!(reconf.kind(), JobKind::Reconfiguration(_)));
    assert_eq!(reconf.time_beg(), t);
    assert_eq!(reconf.time_end(), t + 100.0);
    assert_eq!(reconf.servers(), &[ServerId(0), ServerId(1)]);

    let cont = s.job(added[1]).unwrap();
    assert_eq!(cont.time_beg(), t + 100.0);
    assert_eq!(cont.servers(), &[ServerId(0), ServerId(1)]);
    assert_eq!(cont.work().unwrap().mass, remaining);
    assert_eq!(cont.time_end(), t + 100.0 + remaining / 2.0);

    let interrupted = s.completed("job0").next().unwrap();
    assert!(interrupted.is_interrupted());
    assert_eq!(interrupted.time_end_real(), Some(t));
}

#[test]
fn test_turn_on_precedes_reconfiguration() {
    let t = 20.0;
    let servers = vec![
        Server::with_defaults(ServerId(0)),
        Server::new(ServerId(1), vec![1.0, 3.0], false, 0).unwrap(),
    ];
    let mut s = Scheduler::with_servers(servers).unwrap();
    let key = s
        .add_job(Job::from_request(0.0, &malleable(100.0), vec![ServerId(0)], 1.0).unwrap())
        .unwrap();

    let target = [ServerId(0), ServerId(1)];
    assert!(s.reconfigure_job(t, key, Some(&target), None, false, false).is_err());
    let added = s.reconfigure_job(t, key, Some(&target), None, true, false).unwrap();

    let jobs: Vec<&Job> = added.iter().map(|k| s.job(*k).unwrap()).collect();
    assert!(matches!(jobs[0].kind(), JobKind::TurnOn));
    assert_eq!(jobs[0].servers(), &[ServerId(1)]);
    assert_eq!(jobs[0].time_beg(), t);
    assert_eq!(jobs[0].time_end(), t + DURATION_TURN_ON);
    assert!(matches!(jobs[1].kind(), JobKind::Reconfiguration(_)));
    assert_eq!(jobs[1].time_beg(), t + DURATION_TURN_ON);
    assert!(matches!(jobs[2].kind(), JobKind::Work(_)));
    assert_eq!(jobs[2].time_beg(), jobs[1].time_end());

    let server = s.server(ServerId(1)).unwrap();
    assert!(server.is_turned_off(t - 1.0));
    assert!(server.is_turned_on(t));
}

#[test]
fn test_shrink_turns_off_dropped_server() {
    let mut s = Scheduler::new(2);
    let key = s
        .add_job(
            Job::from_request(0.0, &malleable(90.0), vec![ServerId(0), ServerId(1)], 1.0).unwrap(),
        )
        .unwrap();
    let added = s
        .reconfigure_job(100.0, key, Some(&[ServerId(0)]), None, false, true)
        .unwrap();
    assert_eq!(added.len(), 3);

    let cont = s.job(added[1]).unwrap();
    let off = s.job(added[2]).unwrap();
    assert_eq!(cont.servers(), &[ServerId(0)]);
    assert!(matches!(off.kind(), JobKind::TurnOff));
    assert_eq!(off.servers(), &[ServerId(1)]);
    assert_eq!(off.time_beg(), cont.time_beg());
    assert!(s.server(ServerId(1)).unwrap().is_turned_off(off.time_beg()));
}

#[test]
fn test_frequency_change_then_continuation() {
    let mut s = Scheduler::new(2);
    let key = s
        .add_job(
            Job::from_request(0.0, &malleable(100.0), vec![ServerId(0), ServerId(1)], 1.0).unwrap(),
        )
        .unwrap();
    let added = s.reconfigure_job(50.0, key, None, Some(3.0), false, false).unwrap();
    assert_eq!(added.len(), 3);

    let cont = s.job(added[2]).unwrap();
    assert_eq!(cont.time_beg(), 60.0);
    assert_eq!(cont.work().unwrap().frequency, 3.0);
    // 900 remaining at speed 2 * 3
    assert_eq!(cont.time_end(), 60.0 + 150.0);
    assert_eq!(s.server(ServerId(0)).unwrap().get_frequency(60.0), 3.0);
    assert_eq!(s.server(ServerId(0)).unwrap().get_frequency(55.0), 1.0);
}

#[test]
fn test_stop_after_reconfiguration() {
    let mut s = Scheduler::new(2);
    let key = s
        .add_job(Job::from_request(0.0, &malleable(100.0), vec![ServerId(0)], 1.0).unwrap())
        .unwrap();
    let added = s
        .reconfigure_job(10.0, key, Some(&[ServerId(0), ServerId(1)]), None, false, false)
        .unwrap();
    s.stop(50.0).unwrap();

    assert!(!s.is_working());
    assert_eq!(s.next_departure(), None);
    assert!(s.job(added[0]).unwrap().is_interrupted());
    // the continuation never started
    let cont = s.job(added[1]).unwrap();
    assert_eq!(cont.time_end_real(), Some(cont.time_beg()));
    assert_eq!(cont.remaining_mass(50.0).unwrap(), cont.work().unwrap().mass);
    assert_eq!(s.completed("job0").count(), 3);
}

#[test]
fn test_malformed_workload_rejected_and_sibling_runs() {
    let run = |workload: Vec<Request>| {
        Driver::new(
            DriverConfig::default(),
            Scheduler::new(2),
            Box::new(Fifo),
            StdRng::seed_from_u64(1),
        )
        .unwrap()
        .run(workload)
    };
    let malformed = vec![
        Request::new("fine", 0.0, 10.0),
        Request::new("zero", 1.0, 10.0).with_server_range(0, 1),
    ];
    let oversized = vec![Request::new("wide", 0.0, 10.0).with_server_range(3, 3)];
    assert!(matches!(run(malformed), Err(SimulationError::InvalidWorkload(_))));
    assert!(matches!(run(oversized), Err(SimulationError::InvalidWorkload(_))));

    let outcome = run(vec![Request::new("sibling", 0.0, 10.0).with_server_range(1, 2)]).unwrap();
    assert!(!outcome.timed_out);
    assert_eq!(outcome.scheduler.completed("sibling").count(), 1);
    assert!(outcome.scheduler.completed("sibling").all(Job::is_completed));
}
