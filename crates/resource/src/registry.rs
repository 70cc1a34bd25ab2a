//! Per-kind named resource registry.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rill_core::{Context, Error, ResourceKind, Result};
use tokio::sync::RwLock;

use crate::lease::Lease;

type Entries<T> = HashMap<String, Arc<T>>;

/// Registry of named resources of one kind.
///
/// Readers take a shared lock for the lifetime of their [`Lease`]; create,
/// update and delete take the exclusive lock. Waiting for either side is
/// raced against the caller's [`Context`]. Probes read a separately
/// published snapshot of the registered names and never wait.
pub struct Registry<T: ?Sized> {
    kind: ResourceKind,
    entries: Arc<RwLock<Entries<T>>>,
    names: ArcSwap<HashSet<String>>,
}

impl<T> Registry<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    /// Create an empty registry for `kind`.
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            entries: Arc::new(RwLock::new(HashMap::new())),
            names: ArcSwap::from_pointee(HashSet::new()),
        }
    }

    /// The namespace this registry serves.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Whether `name` is registered, without waiting on in-flight writes.
    pub fn probe(&self, name: &str) -> bool {
        self.names.load().contains(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.load().iter().cloned().collect();
        names.sort();
        names
    }

    /// Borrow the resource registered as `name`.
    ///
    /// Waits while a write is in progress or queued.
    pub async fn lease(&self, ctx: &Context, name: &str) -> Result<Lease<T>> {
        let entries = ctx.run(Arc::clone(&self.entries).read_owned()).await?;
        let Some(resource) = entries.get(name).cloned() else {
            return Err(Error::not_found(self.kind, name));
        };
        Ok(Lease::new(resource, entries))
    }

    /// Register `resource` as `name`, returning the resource it replaced.
    ///
    /// Waits for every outstanding lease to be dropped.
    pub async fn store(&self, ctx: &Context, name: &str, resource: Arc<T>) -> Result<Option<Arc<T>>> {
        let mut entries = ctx.run(self.entries.write()).await?;
        let previous = entries.insert(name.to_owned(), resource);
        self.publish(&entries);
        Ok(previous)
    }

    /// Unregister `name`, returning the removed resource.
    pub async fn remove(&self, ctx: &Context, name: &str) -> Result<Arc<T>> {
        let mut entries = ctx.run(self.entries.write()).await?;
        let removed = entries
            .remove(name)
            .ok_or_else(|| Error::not_found(self.kind, name))?;
        self.publish(&entries);
        Ok(removed)
    }

    /// Unregister everything, returning the removed resources.
    pub async fn drain(&self, ctx: &Context) -> Result<Vec<(String, Arc<T>)>> {
        let mut entries = ctx.run(self.entries.write()).await?;
        let drained = entries.drain().collect();
        self.publish(&entries);
        Ok(drained)
    }

    // Called with the write lock held so probes never run ahead of leases.
    fn publish(&self, entries: &Entries<T>) {
        self.names.store(Arc::new(entries.keys().cloned().collect()));
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("count", &self.names.load().len())
            .finish()
    }
}
