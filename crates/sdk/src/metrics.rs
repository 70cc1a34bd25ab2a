//! Custom component metrics.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rill_telemetry::{CounterMetric, GaugeMetric, Metrics as InternalMetrics, TimerMetric};

/// Creates metrics tagged with the owning component.
///
/// Nothing is registered until one of the `new_*` methods is called.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<dyn InternalMetrics>,
}

impl Metrics {
    pub(crate) fn new(inner: Arc<dyn InternalMetrics>) -> Self {
        Self { inner }
    }

    /// A counter called `name`, with extra `labels`.
    pub fn new_counter(&self, name: &str, labels: &[(&str, &str)]) -> MetricCounter {
        MetricCounter {
            inner: self.inner.counter(name, labels),
        }
    }

    /// A gauge called `name`, with extra `labels`.
    pub fn new_gauge(&self, name: &str, labels: &[(&str, &str)]) -> MetricGauge {
        MetricGauge {
            inner: self.inner.gauge(name, labels),
        }
    }

    /// A timer called `name`, with extra `labels`.
    pub fn new_timer(&self, name: &str, labels: &[(&str, &str)]) -> MetricTimer {
        MetricTimer {
            inner: self.inner.timer(name, labels),
        }
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

/// A monotonically increasing count.
#[derive(Clone)]
pub struct MetricCounter {
    inner: Arc<dyn CounterMetric>,
}

impl MetricCounter {
    /// Add `n`.
    pub fn incr(&self, n: u64) {
        self.inner.incr(n);
    }
}

impl fmt::Debug for MetricCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricCounter").finish_non_exhaustive()
    }
}

/// A value that can go up and down.
#[derive(Clone)]
pub struct MetricGauge {
    inner: Arc<dyn GaugeMetric>,
}

impl MetricGauge {
    /// Replace the value.
    pub fn set(&self, value: i64) {
        self.inner.set(value);
    }

    /// Add `delta`, which may be negative.
    pub fn incr(&self, delta: i64) {
        self.inner.incr(delta);
    }
}

impl fmt::Debug for MetricGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricGauge").finish_non_exhaustive()
    }
}

/// Records durations.
#[derive(Clone)]
pub struct MetricTimer {
    inner: Arc<dyn TimerMetric>,
}

impl MetricTimer {
    /// Record one observation.
    pub fn timing(&self, elapsed: Duration) {
        self.inner.timing(elapsed);
    }
}

impl fmt::Debug for MetricTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricTimer").finish_non_exhaustive()
    }
}
