//! Tests for trace export

use malleable_sim::core::{Job, Request, Scheduler};
use malleable_sim::infra::{export_trace, InMemoryTraceSink, JsonLinesTraceSink};
use malleable_sim::util::{ServerId, SYSTEM_JOB_ID};

fn finished_schedule() -> Scheduler {
    let mut s = Scheduler::new(3);
    let request = Request::new("job0", 0.0, 100.0).with_server_range(1, 2);
    s.schedule(request.clone());
    let work = Job::from_request(0.0, &request, vec![ServerId(0), ServerId(1)], 1.0).unwrap();
    let work = s.add_job(work).unwrap();
    let off = s.turn_off_servers(0.0, &[ServerId(2)]).unwrap();
    s.remove_job(50.0, work).unwrap();
    s.remove_job(500.0, off[0]).unwrap();
    s
}

#[test]
fn test_rows_per_server_grouped_by_id() {
    let s = finished_schedule();
    let mut sink = InMemoryTraceSink::new();
    assert_eq!(export_trace(&s, &mut sink).unwrap(), 3);

    let rows = sink.rows();
    assert_eq!(rows[0].id, SYSTEM_JOB_ID);
    assert_eq!(rows[0].kind, "turn_off");
    assert_eq!(rows[0].server_id, 2);
    assert_eq!(rows[0].time_end_real, Some(500.0));
    assert_eq!(rows[1].id, "job0");
    assert_eq!(rows[1].server_id, 0);
    assert_eq!(rows[2].server_id, 1);
    assert_eq!(rows[2].time_end_real, Some(50.0));
}

#[test]
fn test_active_jobs_are_not_exported() {
    let mut s = Scheduler::new(1);
    let job = Job::from_request(0.0, &Request::new("job0", 0.0, 10.0), vec![ServerId(0)], 1.0).unwrap();
    s.add_job(job).unwrap();
    let mut sink = InMemoryTraceSink::new();
    assert_eq!(export_trace(&s, &mut sink).unwrap(), 0);
}

#[test]
fn test_json_lines_one_line_per_row() {
    let s = finished_schedule();
    let mut sink = JsonLinesTraceSink::new(Vec::new());
    export_trace(&s, &mut sink).unwrap();
    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["id"], "SYSTEM");
    assert_eq!(first["kind"], "turn_off");
}
