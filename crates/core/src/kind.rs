//! Resource namespaces

use std::fmt;

/// The namespace a named resource is registered in.
///
/// Names are unique per kind only: a cache and a rate limit may both be
/// called `"shared"` without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Key/value cache resources.
    Cache,
    /// Rate limit resources.
    RateLimit,
}

impl ResourceKind {
    /// Human readable name used in errors and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::RateLimit => "rate limit",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
