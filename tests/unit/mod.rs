//! Unit tests for individual components

mod builders_test;
mod config_test;
mod error_test;
mod trace_test;
mod workload_test;
