//! Component scoped loggers.

use std::fmt;
use std::sync::Arc;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Very verbose diagnostics.
    Trace,
    /// Diagnostics useful while developing a component.
    Debug,
    /// Normal operational messages.
    Info,
    /// Something unexpected that the component recovered from.
    Warn,
    /// A failure the component could not recover from.
    Error,
}

/// Engine-side logger interface.
///
/// Implementations are shared behind `Arc<dyn Log>` and must be cheap to
/// call from hot paths.
pub trait Log: Send + Sync {
    /// Emit one record.
    fn log(&self, level: Level, message: fmt::Arguments<'_>);

    /// Derive a logger that attaches `fields` to every record.
    fn with_fields(&self, fields: &[(&str, &str)]) -> Arc<dyn Log>;
}

/// Logger that forwards records to `tracing`, tagged with the owning
/// component's label and path.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    label: Arc<str>,
    path: Arc<str>,
    fields: Fields,
}

impl TracingLogger {
    /// Create a logger for the component at `path` labelled `label`.
    pub fn new(label: impl Into<Arc<str>>, path: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            fields: Fields::default(),
        }
    }
}

impl Log for TracingLogger {
    fn log(&self, level: Level, message: fmt::Arguments<'_>) {
        let label = &*self.label;
        let path = &*self.path;
        let fields = &self.fields;
        match level {
            Level::Trace => tracing::trace!(label, path, %fields, "{message}"),
            Level::Debug => tracing::debug!(label, path, %fields, "{message}"),
            Level::Info => tracing::info!(label, path, %fields, "{message}"),
            Level::Warn => tracing::warn!(label, path, %fields, "{message}"),
            Level::Error => tracing::error!(label, path, %fields, "{message}"),
        }
    }

    fn with_fields(&self, fields: &[(&str, &str)]) -> Arc<dyn Log> {
        Arc::new(Self {
            label: Arc::clone(&self.label),
            path: Arc::clone(&self.path),
            fields: self.fields.extend(fields),
        })
    }
}

/// Logger that discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl NoopLogger {
    /// Create a noop logger.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Log for NoopLogger {
    fn log(&self, _level: Level, _message: fmt::Arguments<'_>) {}

    fn with_fields(&self, _fields: &[(&str, &str)]) -> Arc<dyn Log> {
        Arc::new(Self)
    }
}

/// Caller supplied key/value pairs, rendered as `k=v` separated by spaces.
#[derive(Debug, Clone, Default)]
struct Fields(Arc<[(String, String)]>);

impl Fields {
    fn extend(&self, more: &[(&str, &str)]) -> Self {
        let merged: Vec<(String, String)> = self
            .0
            .iter()
            .cloned()
            .chain(more.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())))
            .collect();
        Self(merged.into())
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
