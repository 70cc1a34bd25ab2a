//! Resource manager: shared registries plus per-component observability.

use std::sync::Arc;

use async_trait::async_trait;
use rill_core::{Cache, Context, RateLimit, ResourceKind, Result};
use rill_telemetry::{LocalMetrics, Log, Metrics, NoopLogger, NoopMetrics, TracingLogger};

use crate::config::{ManagerConfig, validate_identifier};
use crate::lease::Lease;
use crate::management::Management;
use crate::path::ComponentPath;
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Resource lifecycle hook
// ---------------------------------------------------------------------------

/// Lets the manager close replaced and removed resources of any kind.
#[async_trait]
trait Closable: Send + Sync {
    async fn close_resource(&self, ctx: &Context) -> Result<()>;
}

#[async_trait]
impl Closable for dyn Cache {
    async fn close_resource(&self, ctx: &Context) -> Result<()> {
        self.close(ctx).await
    }
}

#[async_trait]
impl Closable for dyn RateLimit {
    async fn close_resource(&self, ctx: &Context) -> Result<()> {
        self.close(ctx).await
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// State shared by every view of one manager.
struct Shared {
    caches: Registry<dyn Cache>,
    rate_limits: Registry<dyn RateLimit>,
    logging: bool,
    metrics: Option<LocalMetrics>,
}

/// Named resource manager.
///
/// A `Manager` is a view for one component: it carries that component's
/// label, path, logger and metrics. Views derived with
/// [`child`](Self::child) or [`with_label`](Self::with_label) share
/// the cache and rate limit registries, so a resource stored through any
/// view is visible through all of them.
#[derive(Clone)]
pub struct Manager {
    shared: Arc<Shared>,
    label: Arc<str>,
    path: ComponentPath,
    logger: Arc<dyn Log>,
    metrics: Arc<dyn Metrics>,
}

impl Manager {
    /// Create a manager with default settings: tracing logs, in-memory
    /// metrics, root path.
    #[must_use]
    pub fn new() -> Self {
        Self::build(&ManagerConfig::default())
    }

    /// Create a manager from validated configuration.
    pub fn from_config(config: &ManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &ManagerConfig) -> Self {
        let metrics = config.metrics.enabled.then(|| {
            let root = LocalMetrics::new();
            match &config.metrics.prefix {
                Some(prefix) => root.with_prefix(prefix),
                None => root,
            }
        });
        let shared = Arc::new(Shared {
            caches: Registry::new(ResourceKind::Cache),
            rate_limits: Registry::new(ResourceKind::RateLimit),
            logging: config.logger.enabled,
            metrics,
        });
        Self::view(
            shared,
            config.label.clone(),
            ComponentPath::new(config.path.iter().cloned()),
        )
    }

    fn view(shared: Arc<Shared>, label: Option<String>, path: ComponentPath) -> Self {
        let rendered = path.to_string();
        let label: Arc<str> = match label {
            Some(label) => label.into(),
            None => rendered.as_str().into(),
        };
        let logger: Arc<dyn Log> = if shared.logging {
            Arc::new(TracingLogger::new(Arc::clone(&label), rendered.as_str()))
        } else {
            Arc::new(NoopLogger)
        };
        let metrics: Arc<dyn Metrics> = match &shared.metrics {
            Some(root) => Arc::new(root.with_labels(&[("label", &*label), ("path", &rendered)])),
            None => Arc::new(NoopMetrics),
        };
        Self {
            shared,
            label,
            path,
            logger,
            metrics,
        }
    }

    /// Derive the view for a child component at `segments` below this one.
    ///
    /// The child has no explicit label, so it is labelled with its path.
    pub fn child<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::view(Arc::clone(&self.shared), None, self.path.join(segments))
    }

    /// Derive a view of the same component with an explicit label.
    pub fn with_label(&self, label: &str) -> Result<Self> {
        validate_identifier("label", label)?;
        Ok(Self::view(
            Arc::clone(&self.shared),
            Some(label.to_owned()),
            self.path.clone(),
        ))
    }

    /// This view's structural position.
    pub fn path(&self) -> &ComponentPath {
        &self.path
    }

    /// Root metrics registry shared by every view, when metrics are enabled.
    pub fn local_metrics(&self) -> Option<&LocalMetrics> {
        self.shared.metrics.as_ref()
    }

    /// Registered cache names, sorted.
    pub fn cache_names(&self) -> Vec<String> {
        self.shared.caches.names()
    }

    /// Registered rate limit names, sorted.
    pub fn rate_limit_names(&self) -> Vec<String> {
        self.shared.rate_limits.names()
    }

    /// Register `cache` as `name`, closing any cache it replaces.
    ///
    /// Waits for outstanding leases on the cache registry to finish.
    pub async fn store_cache(&self, ctx: &Context, name: &str, cache: Arc<dyn Cache>) -> Result<()> {
        self.store(&self.shared.caches, ctx, name, cache).await
    }

    /// Unregister and close the cache registered as `name`.
    pub async fn remove_cache(&self, ctx: &Context, name: &str) -> Result<()> {
        self.remove(&self.shared.caches, ctx, name).await
    }

    /// Register `rate_limit` as `name`, closing any rate limit it replaces.
    pub async fn store_rate_limit(
        &self,
        ctx: &Context,
        name: &str,
        rate_limit: Arc<dyn RateLimit>,
    ) -> Result<()> {
        self.store(&self.shared.rate_limits, ctx, name, rate_limit)
            .await
    }

    /// Unregister and close the rate limit registered as `name`.
    pub async fn remove_rate_limit(&self, ctx: &Context, name: &str) -> Result<()> {
        self.remove(&self.shared.rate_limits, ctx, name).await
    }

    /// Unregister and close every resource of every kind.
    ///
    /// All resources are closed even if some fail; the first failure is
    /// returned. Each kind is drained and closed before the next is drained,
    /// so if `ctx` ends while waiting on a later registry, everything already
    /// unregistered has been closed and the rest stays registered for a
    /// retry.
    pub async fn close(&self, ctx: &Context) -> Result<()> {
        let mut first_err = None;

        let caches = self.shared.caches.drain(ctx).await?;
        for (name, cache) in caches {
            if let Err(e) = self.close_one(ResourceKind::Cache, &name, &*cache, ctx).await {
                first_err.get_or_insert(e);
            }
        }

        match self.shared.rate_limits.drain(ctx).await {
            Ok(rate_limits) => {
                for (name, rate_limit) in rate_limits {
                    if let Err(e) = self
                        .close_one(ResourceKind::RateLimit, &name, &*rate_limit, ctx)
                        .await
                    {
                        first_err.get_or_insert(e);
                    }
                }
            }
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => {
                tracing::debug!(label = %self.label, "Closed all resources");
                Ok(())
            }
        }
    }

    async fn store<T>(
        &self,
        registry: &Registry<T>,
        ctx: &Context,
        name: &str,
        resource: Arc<T>,
    ) -> Result<()>
    where
        T: ?Sized + Closable + 'static,
    {
        let previous = registry.store(ctx, name, resource).await?;
        tracing::debug!(
            label = %self.label,
            kind = %registry.kind(),
            resource = name,
            replaced = previous.is_some(),
            "Stored resource"
        );
        if let Some(previous) = previous {
            // The registry already points at the new resource; a failed close
            // of the old one is reported but does not undo the store.
            let _ = self.close_one(registry.kind(), name, &*previous, ctx).await;
        }
        Ok(())
    }

    async fn remove<T>(&self, registry: &Registry<T>, ctx: &Context, name: &str) -> Result<()>
    where
        T: ?Sized + Closable + 'static,
    {
        let removed = registry.remove(ctx, name).await?;
        tracing::debug!(
            label = %self.label,
            kind = %registry.kind(),
            resource = name,
            "Removed resource"
        );
        self.close_one(registry.kind(), name, &*removed, ctx).await
    }

    async fn close_one<T>(
        &self,
        kind: ResourceKind,
        name: &str,
        resource: &T,
        ctx: &Context,
    ) -> Result<()>
    where
        T: ?Sized + Closable,
    {
        resource.close_resource(ctx).await.inspect_err(|e| {
            tracing::warn!(
                label = %self.label,
                %kind,
                resource = name,
                error = %e,
                "Failed to close resource"
            );
        })
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("label", &self.label)
            .field("path", &self.path.to_string())
            .field("caches", &self.shared.caches)
            .field("rate_limits", &self.shared.rate_limits)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Management for Manager {
    fn label(&self) -> &str {
        &self.label
    }

    fn logger(&self) -> Arc<dyn Log> {
        Arc::clone(&self.logger)
    }

    fn metrics(&self) -> Arc<dyn Metrics> {
        Arc::clone(&self.metrics)
    }

    async fn lease_cache(&self, ctx: &Context, name: &str) -> Result<Lease<dyn Cache>> {
        self.shared.caches.lease(ctx, name).await
    }

    fn probe_cache(&self, name: &str) -> bool {
        self.shared.caches.probe(name)
    }

    async fn lease_rate_limit(&self, ctx: &Context, name: &str) -> Result<Lease<dyn RateLimit>> {
        self.shared.rate_limits.lease(ctx, name).await
    }

    fn probe_rate_limit(&self, name: &str) -> bool {
        self.shared.rate_limits.probe(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_core::Error;
    use rill_core::testing::{FixedRateLimit, MemoryCache};
    use std::time::Duration;

    fn ctx() -> Context {
        Context::new()
    }

    #[test]
    fn root_view_is_labelled_root() {
        let mgr = Manager::new();
        assert_eq!(mgr.label(), "root");
        assert!(mgr.path().is_root());
    }

    #[test]
    fn child_views_derive_labels_from_path() {
        let mgr = Manager::new();
        let child = mgr.child(["input", "broker", "inputs", "0"]);
        assert_eq!(child.label(), "root.input.broker.inputs.0");
        let grandchild = child.child(["processors", "1"]);
        assert_eq!(
            grandchild.label(),
            "root.input.broker.inputs.0.processors.1"
        );
    }

    #[test]
    fn explicit_label_wins_until_path_changes() {
        let mgr = Manager::new().child(["pipeline"]);
        let labelled = mgr.with_label("dedupe").unwrap();
        assert_eq!(labelled.label(), "dedupe");
        assert_eq!(labelled.path(), mgr.path());
        assert_eq!(
            labelled.child(["0"]).label(),
            "root.pipeline.0",
            "children are labelled by position"
        );
    }

    #[test]
    fn invalid_label_is_rejected() {
        let err = Manager::new().with_label("Not Valid").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn from_config_applies_label_and_path() {
        let config = ManagerConfig {
            label: Some("ingest".into()),
            path: vec!["input".into()],
            ..Default::default()
        };
        let mgr = Manager::from_config(&config).unwrap();
        assert_eq!(mgr.label(), "ingest");
        assert_eq!(mgr.path().to_string(), "root.input");
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let config = ManagerConfig {
            label: Some(String::new()),
            ..Default::default()
        };
        assert!(Manager::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn views_share_registries() {
        let root = Manager::new();
        let child = root.child(["output"]);
        root.store_cache(&ctx(), "dedupe", Arc::new(MemoryCache::new("dedupe")))
            .await
            .unwrap();
        assert!(child.probe_cache("dedupe"));
        assert!(child.lease_cache(&ctx(), "dedupe").await.is_ok());
        assert_eq!(child.cache_names(), vec!["dedupe"]);
    }

    #[tokio::test]
    async fn cache_and_rate_limit_namespaces_are_separate() {
        let mgr = Manager::new();
        mgr.store_cache(&ctx(), "shared", Arc::new(MemoryCache::new("shared")))
            .await
            .unwrap();
        assert!(mgr.probe_cache("shared"));
        assert!(!mgr.probe_rate_limit("shared"));

        mgr.store_rate_limit(&ctx(), "shared", Arc::new(FixedRateLimit::unlimited()))
            .await
            .unwrap();
        assert!(mgr.probe_rate_limit("shared"));
        assert_eq!(mgr.cache_names(), mgr.rate_limit_names());
    }

    #[tokio::test]
    async fn replacing_a_cache_closes_the_previous_one() {
        let mgr = Manager::new();
        let first = Arc::new(MemoryCache::new("first"));
        mgr.store_cache(&ctx(), "c", first.clone()).await.unwrap();
        mgr.store_cache(&ctx(), "c", Arc::new(MemoryCache::new("second")))
            .await
            .unwrap();
        assert!(first.is_closed());
    }

    #[tokio::test]
    async fn removing_closes_and_unregisters() {
        let mgr = Manager::new();
        let limit = Arc::new(FixedRateLimit::unlimited());
        mgr.store_rate_limit(&ctx(), "api", limit.clone())
            .await
            .unwrap();
        mgr.remove_rate_limit(&ctx(), "api").await.unwrap();
        assert!(limit.is_closed());
        assert!(!mgr.probe_rate_limit("api"));
        let err = mgr.lease_rate_limit(&ctx(), "api").await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                kind: ResourceKind::RateLimit,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn removing_unknown_is_not_found() {
        let mgr = Manager::new();
        assert!(mgr.remove_cache(&ctx(), "ghost").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn close_drains_everything() {
        let mgr = Manager::new();
        let cache = Arc::new(MemoryCache::new("c"));
        let limit = Arc::new(FixedRateLimit::unlimited());
        mgr.store_cache(&ctx(), "c", cache.clone()).await.unwrap();
        mgr.store_rate_limit(&ctx(), "r", limit.clone())
            .await
            .unwrap();
        mgr.close(&ctx()).await.unwrap();
        assert!(cache.is_closed());
        assert!(limit.is_closed());
        assert!(mgr.cache_names().is_empty());
        assert!(mgr.rate_limit_names().is_empty());
    }

    #[tokio::test]
    async fn component_metrics_carry_label() {
        let mgr = Manager::new().child(["pipeline"]);
        let labelled = mgr.with_label("enrich").unwrap();
        labelled.metrics().counter("processed", &[]).incr(2);
        let root = mgr.local_metrics().unwrap();
        assert_eq!(
            root.counter_value(
                "processed",
                &[("label", "enrich"), ("path", "root.pipeline")]
            ),
            Some(2)
        );
    }

    #[tokio::test]
    async fn disabled_metrics_have_no_registry() {
        let config = ManagerConfig {
            metrics: crate::config::MetricsConfig {
                enabled: false,
                prefix: None,
            },
            ..Default::default()
        };
        let mgr = Manager::from_config(&config).unwrap();
        assert!(mgr.local_metrics().is_none());
        mgr.metrics().timer("noop", &[]).timing(Duration::from_millis(1));
    }
}
