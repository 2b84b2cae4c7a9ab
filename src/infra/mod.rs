//! Adapters around the core: synthetic workload source and trace sinks.

pub mod trace;
pub mod workload;

pub use trace::{export_trace, InMemoryTraceSink, JsonLinesTraceSink, TraceSink};
pub use workload::{WorkloadGenerator, WorkloadParams};
