//! Metrics primitives and component scoped registries.
//!
//! Provides lightweight metric types (counter, gauge, timer), the
//! engine-side [`Metrics`] interface that managers hand to components, and
//! two implementations: [`LocalMetrics`] stores values in-memory with
//! atomics, [`NoopMetrics`] discards them.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

/// Engine-side counter handle.
pub trait CounterMetric: Send + Sync {
    /// Increment by `n`.
    fn incr(&self, n: u64);
}

/// Engine-side gauge handle.
pub trait GaugeMetric: Send + Sync {
    /// Set to `value`.
    fn set(&self, value: i64);
    /// Add `delta`, which may be negative.
    fn incr(&self, delta: i64);
}

/// Engine-side timer handle.
pub trait TimerMetric: Send + Sync {
    /// Record one observed duration.
    fn timing(&self, elapsed: Duration);
}

/// Engine-side metrics interface.
///
/// `labels` are extra key/value pairs; implementations add their own
/// component labels on top.
pub trait Metrics: Send + Sync {
    /// Get or create a counter.
    fn counter(&self, name: &str, labels: &[(&str, &str)]) -> Arc<dyn CounterMetric>;
    /// Get or create a gauge.
    fn gauge(&self, name: &str, labels: &[(&str, &str)]) -> Arc<dyn GaugeMetric>;
    /// Get or create a timer.
    fn timer(&self, name: &str, labels: &[(&str, &str)]) -> Arc<dyn TimerMetric>;
}

/// An incrementing counter.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    /// Current value.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl CounterMetric for Counter {
    fn incr(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }
}

/// A gauge that can go up and down.
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    value: Arc<AtomicI64>,
}

impl Gauge {
    /// Current value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl GaugeMetric for Gauge {
    fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }

    fn incr(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }
}

/// A timer that keeps the count and total of its observations.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    count: Arc<AtomicU64>,
    total_nanos: Arc<AtomicU64>,
}

impl Timer {
    /// Number of observations recorded.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Sum of all observations.
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.total_nanos.load(Ordering::Relaxed))
    }
}

impl TimerMetric for Timer {
    fn timing(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(nanos, Ordering::Relaxed);
    }
}

/// Identity of one metric series: name plus sorted labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesKey {
    name: String,
    labels: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct Series {
    counters: DashMap<SeriesKey, Counter>,
    gauges: DashMap<SeriesKey, Gauge>,
    timers: DashMap<SeriesKey, Timer>,
}

/// In-memory metrics registry.
///
/// Views derived with [`with_labels`](Self::with_labels) or
/// [`with_prefix`](Self::with_prefix) share the same storage, so a manager
/// can hand each component its own labelled view and read every series
/// back from the root.
///
/// # Examples
///
/// ```
/// use rill_telemetry::{LocalMetrics, Metrics};
///
/// let root = LocalMetrics::new();
/// let component = root.with_labels(&[("label", "dedupe")]);
/// component.counter("dropped", &[]).incr(2);
///
/// assert_eq!(root.counter_value("dropped", &[("label", "dedupe")]), Some(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocalMetrics {
    series: Arc<Series>,
    prefix: Option<Arc<str>>,
    labels: Vec<(String, String)>,
}

impl LocalMetrics {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a view that adds `labels` to every series it creates.
    pub fn with_labels(&self, labels: &[(&str, &str)]) -> Self {
        let mut merged = self.labels.clone();
        for (key, value) in labels {
            merged.retain(|(k, _)| k != key);
            merged.push(((*key).to_owned(), (*value).to_owned()));
        }
        Self {
            series: Arc::clone(&self.series),
            prefix: self.prefix.clone(),
            labels: merged,
        }
    }

    /// Derive a view that prefixes every metric name with `prefix_`.
    pub fn with_prefix(&self, prefix: &str) -> Self {
        Self {
            series: Arc::clone(&self.series),
            prefix: Some(prefix.into()),
            labels: self.labels.clone(),
        }
    }

    /// Current value of a counter series, if it was ever created.
    pub fn counter_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        let key = self.key(name, labels);
        self.series.counters.get(&key).map(|c| c.get())
    }

    /// Current value of a gauge series, if it was ever created.
    pub fn gauge_value(&self, name: &str, labels: &[(&str, &str)]) -> Option<i64> {
        let key = self.key(name, labels);
        self.series.gauges.get(&key).map(|g| g.get())
    }

    /// Count and total of a timer series, if it was ever created.
    pub fn timer_stats(&self, name: &str, labels: &[(&str, &str)]) -> Option<(u64, Duration)> {
        let key = self.key(name, labels);
        self.series.timers.get(&key).map(|t| (t.count(), t.total()))
    }

    /// Number of series of any type.
    pub fn series_count(&self) -> usize {
        self.series.counters.len() + self.series.gauges.len() + self.series.timers.len()
    }

    fn key(&self, name: &str, labels: &[(&str, &str)]) -> SeriesKey {
        let name = match &self.prefix {
            Some(prefix) => format!("{prefix}_{name}"),
            None => name.to_owned(),
        };
        let mut all = self.labels.clone();
        for (key, value) in labels {
            all.retain(|(k, _)| k != key);
            all.push(((*key).to_owned(), (*value).to_owned()));
        }
        all.sort();
        SeriesKey { name, labels: all }
    }
}

impl Metrics for LocalMetrics {
    fn counter(&self, name: &str, labels: &[(&str, &str)]) -> Arc<dyn CounterMetric> {
        let key = self.key(name, labels);
        Arc::new(self.series.counters.entry(key).or_default().clone())
    }

    fn gauge(&self, name: &str, labels: &[(&str, &str)]) -> Arc<dyn GaugeMetric> {
        let key = self.key(name, labels);
        Arc::new(self.series.gauges.entry(key).or_default().clone())
    }

    fn timer(&self, name: &str, labels: &[(&str, &str)]) -> Arc<dyn TimerMetric> {
        let key = self.key(name, labels);
        Arc::new(self.series.timers.entry(key).or_default().clone())
    }
}

/// A metrics implementation that discards all observations.
///
/// Useful for testing and contexts where metrics are not needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl NoopMetrics {
    /// Create a noop registry.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy)]
struct NoopMetric;

impl CounterMetric for NoopMetric {
    fn incr(&self, _n: u64) {}
}

impl GaugeMetric for NoopMetric {
    fn set(&self, _value: i64) {}
    fn incr(&self, _delta: i64) {}
}

impl TimerMetric for NoopMetric {
    fn timing(&self, _elapsed: Duration) {}
}

impl Metrics for NoopMetrics {
    fn counter(&self, _name: &str, _labels: &[(&str, &str)]) -> Arc<dyn CounterMetric> {
        Arc::new(NoopMetric)
    }

    fn gauge(&self, _name: &str, _labels: &[(&str, &str)]) -> Arc<dyn GaugeMetric> {
        Arc::new(NoopMetric)
    }

    fn timer(&self, _name: &str, _labels: &[(&str, &str)]) -> Arc<dyn TimerMetric> {
        Arc::new(NoopMetric)
    }
}
