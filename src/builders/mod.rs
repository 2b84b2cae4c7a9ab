//! Builders turning configuration into runnable experiments.

pub mod experiment_builder;

pub use experiment_builder::build_experiments;
