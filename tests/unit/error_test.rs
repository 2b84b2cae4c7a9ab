//! Tests for error types

use malleable_sim::core::SimulationError;
use malleable_sim::util::{JobKey, ServerId};

#[test]
fn test_overlap_error() {
    let err = SimulationError::Overlap {
        server: ServerId(2),
        job: "job4".to_string(),
    };
    assert_eq!(format!("{}", err), "job job4 overlaps an assigned job on server-2");
    assert!(err.is_invariant_violation());
}

#[test]
fn test_job_not_active_error() {
    let err = SimulationError::JobNotActive(JobKey(9));
    assert_eq!(format!("{}", err), "job #9 is not active");
    assert!(err.is_invariant_violation());
}

#[test]
fn test_transition_error() {
    let err = SimulationError::InvalidTransition {
        id: "job0".to_string(),
        time: 5.0,
        reason: "completion before planned end".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "invalid transition for job job0 at 5: completion before planned end"
    );
}

#[test]
fn test_config_error() {
    let err = SimulationError::Config("num_servers must be greater than 0".to_string());
    assert_eq!(format!("{}", err), "config invalid: num_servers must be greater than 0");
    assert!(!err.is_invariant_violation());
}

#[test]
fn test_input_errors_are_not_invariant_violations() {
    assert!(!SimulationError::InvalidWorkload("x".into()).is_invariant_violation());
    assert!(!SimulationError::InvalidServer("x".into()).is_invariant_violation());
    assert!(!SimulationError::Export("x".into()).is_invariant_violation());
    assert!(SimulationError::UnknownServer(ServerId(1)).is_invariant_violation());
}
