//! Shared identifiers and telemetry helpers.

pub mod ids;
pub mod telemetry;

pub use ids::*;
pub use telemetry::*;
