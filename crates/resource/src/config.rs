//! Manager configuration types

use rill_core::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`Manager`](crate::Manager).
///
/// Reading this from a file is the caller's job; the type only derives
/// serde so it can be embedded in a larger config tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ManagerConfig {
    /// Explicit label for the root component view.
    pub label: Option<String>,
    /// Root-relative path of the root component view.
    pub path: Vec<String>,
    /// Logger settings.
    pub logger: LoggerConfig,
    /// Metrics settings.
    pub metrics: MetricsConfig,
}

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct LoggerConfig {
    /// Emit component logs through `tracing`. When false components get a
    /// logger that discards everything.
    pub enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Metrics settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct MetricsConfig {
    /// Record component metrics in memory. When false components get a
    /// recorder that discards everything.
    pub enabled: bool,
    /// Prefix applied to every metric name.
    pub prefix: Option<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefix: None,
        }
    }
}

impl ManagerConfig {
    /// Check labels, path segments and the metric prefix.
    pub fn validate(&self) -> Result<()> {
        if let Some(label) = &self.label {
            validate_identifier("label", label)?;
        }
        if let Some(segment) = self
            .path
            .iter()
            .find(|s| s.is_empty() || s.contains('.'))
        {
            return Err(Error::configuration(format!(
                "invalid path segment '{segment}': segments must be non-empty and must not contain '.'"
            )));
        }
        if let Some(prefix) = &self.metrics.prefix {
            validate_identifier("metrics prefix", prefix)?;
        }
        Ok(())
    }
}

/// Labels and prefixes are restricted to lowercase alphanumerics and
/// underscores so they are safe as metric label values and log fields.
pub(crate) fn validate_identifier(what: &str, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "invalid {what} '{value}': expected a non-empty string of [a-z0-9_]"
        )))
    }
}
