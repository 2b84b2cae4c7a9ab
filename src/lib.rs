//! # Malleable Sim
//!
//! A deterministic simulator of malleable, frequency-scalable jobs on a
//! fixed pool of servers, used to compare scheduling policies.
//!
//! Jobs may change their server count while they run (malleability) and
//! servers may change their frequency (DVFS) or power state. Every such
//! change is modelled by synthetic jobs that occupy server time, so a
//! schedule accounts for the cost of its own reconfigurations.
//!
//! ## Key Features
//!
//! - **Event-Sourced Servers**: Power and frequency state at any time are
//!   derived from a log of transition jobs, never stored as a flag
//! - **Reconfiguration Calculus**: Turn-on, data movement, frequency change
//!   and continuation jobs are sequenced without gaps or overlaps
//! - **Atomic Scheduler Primitives**: Failed operations leave the schedule
//!   untouched; invariant violations abort the run
//! - **Pluggable Policies**: Strategies implement [`core::Policy`] and only
//!   use the scheduler's public primitives
//! - **Replayable Runs**: One explicitly seeded generator per run drives the
//!   workload and every randomized policy decision
//!
//! ## Running an experiment
//!
//! ```rust,no_run
//! use malleable_sim::config::ExperimentConfig;
//! use malleable_sim::infra::{export_trace, InMemoryTraceSink};
//! use malleable_sim::policies::PolicyKind;
//! use malleable_sim::runtime::Experiment;
//!
//! # fn main() -> malleable_sim::core::AppResult<()> {
//! malleable_sim::util::init_tracing();
//!
//! let config = ExperimentConfig {
//!     policy: PolicyKind::FifoReconfig,
//!     num_servers: 8,
//!     num_jobs: 100,
//!     update_on_departure: true,
//!     ..ExperimentConfig::default()
//! };
//! let experiment = Experiment::new("reconfig", config)?;
//! for outcome in experiment.run() {
//!     let outcome = outcome?;
//!     let mut sink = InMemoryTraceSink::new();
//!     export_trace(&outcome.scheduler, &mut sink)?;
//!     println!("ended at {} with {} rows", outcome.end_time, sink.rows().len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! For complete scenarios, see `tests/scenario_test.rs`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Entity model, reconfiguration calculus and scheduler bookkeeping.
pub mod core;
/// Configuration models for experiments, policies and workloads.
pub mod config;
/// Builders to construct experiments from configuration.
pub mod builders;
/// Synthetic workload source and trace sinks.
pub mod infra;
/// Scheduling policies.
pub mod policies;
/// Event loop and experiment orchestration.
pub mod runtime;
/// Shared identifiers and telemetry.
pub mod util;
