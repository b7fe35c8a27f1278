//! Metrics sink adapters

pub mod tracing_sink;
