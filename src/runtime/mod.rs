//! Event loop and experiment orchestration.

pub mod driver;
pub mod experiment;

pub use driver::{Driver, DriverConfig, RunOutcome};
pub use experiment::Experiment;
