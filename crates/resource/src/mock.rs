//! Configuration-free manager for tests.

use std::sync::Arc;

use async_trait::async_trait;
use rill_core::{Cache, Context, Error, RateLimit, ResourceKind, Result};
use rill_telemetry::{Log, Metrics, NoopLogger, NoopMetrics};

use crate::lease::Lease;
use crate::management::Management;

/// A manager with empty registries and inert observability.
///
/// Probes report nothing registered, leases fail with
/// [`Error::NotFound`] (or the context's own error if it has already ended),
/// and the logger and metrics accept every call without producing output.
///
/// Construction never fails because nothing is configured. That holds only
/// while an empty registry is always valid; if registry population ever gains
/// failure modes for empty input this type has to change, so treat it as a
/// smoke-test helper rather than a behavioural reference.
#[derive(Debug, Clone)]
pub struct MockManager {
    logger: Arc<NoopLogger>,
    metrics: Arc<NoopMetrics>,
}

impl MockManager {
    /// Label reported by every mock manager.
    pub const LABEL: &'static str = "mock";

    /// Create a mock manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            logger: Arc::new(NoopLogger::new()),
            metrics: Arc::new(NoopMetrics::new()),
        }
    }
}

impl Default for MockManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Management for MockManager {
    fn label(&self) -> &str {
        Self::LABEL
    }

    fn logger(&self) -> Arc<dyn Log> {
        self.logger.clone()
    }

    fn metrics(&self) -> Arc<dyn Metrics> {
        self.metrics.clone()
    }

    async fn lease_cache(&self, ctx: &Context, name: &str) -> Result<Lease<dyn Cache>> {
        ctx.check()?;
        Err(Error::not_found(ResourceKind::Cache, name))
    }

    fn probe_cache(&self, _name: &str) -> bool {
        false
    }

    async fn lease_rate_limit(&self, ctx: &Context, name: &str) -> Result<Lease<dyn RateLimit>> {
        ctx.check()?;
        Err(Error::not_found(ResourceKind::RateLimit, name))
    }

    fn probe_rate_limit(&self, _name: &str) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_registry_is_empty() {
        let mgr = MockManager::new();
        assert!(!mgr.probe_cache("x"));
        assert!(!mgr.probe_rate_limit("x"));
        assert!(matches!(
            mgr.lease_cache(&Context::new(), "x").await.unwrap_err(),
            Error::NotFound {
                kind: ResourceKind::Cache,
                ..
            }
        ));
        assert!(matches!(
            mgr.lease_rate_limit(&Context::new(), "x").await.unwrap_err(),
            Error::NotFound {
                kind: ResourceKind::RateLimit,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn cancelled_context_reports_cancellation_first() {
        let mgr = MockManager::new();
        let ctx = Context::new();
        ctx.cancel();
        assert!(matches!(
            mgr.lease_cache(&ctx, "x").await.unwrap_err(),
            Error::Cancelled
        ));
        assert!(matches!(
            mgr.lease_rate_limit(&ctx, "x").await.unwrap_err(),
            Error::Cancelled
        ));
    }

    #[test]
    fn mock_label_is_stable() {
        assert_eq!(MockManager::new().label(), "mock");
        assert_eq!(MockManager::default().label(), MockManager::LABEL);
    }
}
