//! Component logger.

use std::fmt;
use std::sync::Arc;

use rill_telemetry::{Level, Log};

/// A logger preset with the owning component's label and position.
///
/// Cheap to clone; clones share the underlying logger.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<dyn Log>,
}

impl Logger {
    pub(crate) fn new(inner: Arc<dyn Log>) -> Self {
        Self { inner }
    }

    /// Log at trace level.
    pub fn trace(&self, message: impl fmt::Display) {
        self.emit(Level::Trace, message);
    }

    /// Log at debug level.
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::Debug, message);
    }

    /// Log at info level.
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message);
    }

    /// Log at warn level.
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Level::Warn, message);
    }

    /// Log at error level.
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::Error, message);
    }

    /// A logger that attaches `fields` to every record, on top of whatever
    /// this one already attaches.
    #[must_use]
    pub fn with(&self, fields: &[(&str, &str)]) -> Logger {
        Self::new(self.inner.with_fields(fields))
    }

    fn emit(&self, level: Level, message: impl fmt::Display) {
        self.inner.log(level, format_args!("{message}"));
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
