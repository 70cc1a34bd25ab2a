//! The contract a resource manager offers to component facades.

use std::sync::Arc;

use async_trait::async_trait;
use rill_core::{Cache, Context, RateLimit, Result};
use rill_telemetry::{Log, Metrics};

use crate::lease::Lease;

/// What a component-facing facade needs from a resource manager.
///
/// Observability accessors and probes never block. Leases may wait while the
/// manager is mutating the registry of the requested kind; the wait is raced
/// against `ctx`, and an already ended `ctx` fails before any lookup.
#[async_trait]
pub trait Management: Send + Sync {
    /// Label of the component this view belongs to.
    fn label(&self) -> &str;

    /// Logger preset with this component's context.
    fn logger(&self) -> Arc<dyn Log>;

    /// Metrics recorder preset with this component's context.
    fn metrics(&self) -> Arc<dyn Metrics>;

    /// Borrow the cache registered as `name`.
    async fn lease_cache(&self, ctx: &Context, name: &str) -> Result<Lease<dyn Cache>>;

    /// Whether a cache is registered as `name`.
    fn probe_cache(&self, name: &str) -> bool;

    /// Borrow the rate limit registered as `name`.
    async fn lease_rate_limit(&self, ctx: &Context, name: &str) -> Result<Lease<dyn RateLimit>>;

    /// Whether a rate limit is registered as `name`.
    fn probe_rate_limit(&self, name: &str) -> bool;
}
