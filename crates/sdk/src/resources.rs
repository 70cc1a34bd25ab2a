//! The resources facade handed to components.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use rill_core::{Context, Result};
use rill_resource::{Management, MockManager};

use crate::cache::Cache;
use crate::logger::Logger;
use crate::metrics::Metrics;
use crate::ratelimit::RateLimit;

/// Access to service-wide resources for one component instance.
///
/// Bound to a single manager for its whole life. Holds no locks and no
/// resource data: every call is forwarded to the manager, and failures come
/// back exactly as the manager reported them.
#[derive(Clone)]
pub struct Resources {
    mgr: Arc<dyn Management>,
}

impl Resources {
    /// Bind a facade to `mgr`.
    pub fn new(mgr: Arc<dyn Management>) -> Self {
        Self { mgr }
    }

    /// A facade with valid but ineffective resources and observability.
    ///
    /// Useful for testing components that take a `Resources` but do not
    /// exercise it. No caches or rate limits exist, and the logger and
    /// metrics discard everything. See [`MockManager`] for why this should
    /// not be relied on beyond smoke tests.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(Arc::new(MockManager::new()))
    }

    /// Label identifying this component instance. Either set explicitly in
    /// config or generated from the component's position in the config.
    pub fn label(&self) -> &str {
        self.mgr.label()
    }

    /// A logger preset with context about this component.
    pub fn logger(&self) -> Logger {
        Logger::new(self.mgr.logger())
    }

    /// A recorder for creating custom metrics tagged with this component.
    pub fn metrics(&self) -> Metrics {
        Metrics::new(self.mgr.metrics())
    }

    /// Run `f` against the cache resource registered as `name`.
    ///
    /// May wait while the cache registry is being modified. Fails without
    /// calling `f` when no such cache exists or `ctx` ends first. The cache
    /// cannot be replaced or removed until `f`'s future completes, and the
    /// view cannot outlive it.
    pub async fn access_cache<F, R>(&self, ctx: &Context, name: &str, f: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c Cache<'c>) -> BoxFuture<'c, R> + Send,
    {
        let lease = self.mgr.lease_cache(ctx, name).await?;
        let cache = Cache::new(&*lease);
        Ok(f(&cache).await)
    }

    /// Whether a cache called `name` is registered.
    ///
    /// Never waits and never fails, so it is safe to call while a component
    /// is still being built and other resources may not exist yet.
    pub fn has_cache(&self, name: &str) -> bool {
        self.mgr.probe_cache(name)
    }

    /// Run `f` against the rate limit resource registered as `name`.
    ///
    /// Same waiting, failure and scoping rules as
    /// [`access_cache`](Self::access_cache).
    pub async fn access_rate_limit<F, R>(&self, ctx: &Context, name: &str, f: F) -> Result<R>
    where
        F: for<'c> FnOnce(&'c RateLimit<'c>) -> BoxFuture<'c, R> + Send,
    {
        let lease = self.mgr.lease_rate_limit(ctx, name).await?;
        let rate_limit = RateLimit::new(&*lease);
        Ok(f(&rate_limit).await)
    }

    /// Whether a rate limit called `name` is registered.
    pub fn has_rate_limit(&self, name: &str) -> bool {
        self.mgr.probe_rate_limit(name)
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("label", &self.label())
            .finish_non_exhaustive()
    }
}
