//! Tests for the synthetic workload source

use malleable_sim::infra::{WorkloadGenerator, WorkloadParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_different_seeds_differ() {
    let generator = WorkloadGenerator::new(&WorkloadParams::default()).unwrap();
    let a = generator.generate(&mut StdRng::seed_from_u64(1), 20, 4);
    let b = generator.generate(&mut StdRng::seed_from_u64(2), 20, 4);
    assert_ne!(a, b);
}

#[test]
fn test_mass_median_tracks_params() {
    let params = WorkloadParams {
        mass: 1000.0,
        disparity: 1.0,
        ..WorkloadParams::default()
    };
    let generator = WorkloadGenerator::new(&params).unwrap();
    let requests = generator.generate(&mut StdRng::seed_from_u64(3), 10, 2);
    // no spread: every mass is the reference mass
    assert!(requests.iter().all(|r| (r.mass - 1000.0).abs() < 1e-6));
}

#[test]
fn test_single_server_pool() {
    let generator = WorkloadGenerator::new(&WorkloadParams::default()).unwrap();
    let requests = generator.generate(&mut StdRng::seed_from_u64(3), 5, 1);
    assert!(requests.iter().all(|r| r.max_server_count == 1));
    assert!(requests[0].submission_time >= 0.0);
}
