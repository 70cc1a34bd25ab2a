#![warn(missing_docs)]

//! # Rill Telemetry
//!
//! Component scoped observability capabilities handed out by resource
//! managers.
//!
//! This crate provides:
//! - [`Log`] -- engine-side logger interface, with [`TracingLogger`] (emits
//!   `tracing` events tagged with the component label and path) and
//!   [`NoopLogger`]
//! - [`Metrics`] -- engine-side metrics interface, with [`LocalMetrics`]
//!   (in-memory atomics, no exporter) and [`NoopMetrics`]
//!
//! Exporting metrics and formatting log output are left to whoever installs
//! the `tracing` subscriber and reads the registry.

pub mod log;
pub mod metrics;

pub use log::{Level, Log, NoopLogger, TracingLogger};
pub use metrics::{
    Counter, CounterMetric, Gauge, GaugeMetric, LocalMetrics, Metrics, NoopMetrics, Timer,
    TimerMetric,
};
