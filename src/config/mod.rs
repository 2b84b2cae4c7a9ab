//! Configuration models for experiments, policies and workloads.

pub mod experiment;

pub use experiment::{ExperimentConfig, SimulationConfig};
