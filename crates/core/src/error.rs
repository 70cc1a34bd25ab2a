//! Error types for resource access
use thiserror::Error;

use crate::kind::ResourceKind;

/// Result type for resource operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for named resource access and capability calls
#[derive(Error, Debug)]
pub enum Error {
    /// No resource of the requested kind is registered under the name
    #[error("{kind} resource '{name}' was not found")]
    NotFound {
        /// The namespace that was searched
        kind: ResourceKind,
        /// The requested resource name
        name: String,
    },

    /// The caller's context was cancelled before the operation could proceed
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's context deadline passed before the operation could proceed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// A cache lookup found no value for the key
    #[error("key '{key}' does not exist")]
    KeyNotFound {
        /// The missing key
        key: String,
    },

    /// A cache add found an existing value for the key
    #[error("key '{key}' already exists")]
    KeyAlreadyExists {
        /// The conflicting key
        key: String,
    },

    /// Resource or manager configuration is invalid
    #[error("configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
    },

    /// A capability implementation reported a failure
    #[error("resource '{resource}' failed: {message}")]
    Backend {
        /// The resource name or implementation identifier
        resource: String,
        /// The failure reason
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a not-found error for `name` in the `kind` namespace
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a backend error without an underlying source
    pub fn backend(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            resource: resource.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Whether the requested resource or key does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::KeyNotFound { .. })
    }

    /// Whether the caller's context ended the operation
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}
