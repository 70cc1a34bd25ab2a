//! Borrow-scoped cache view.

use std::fmt;
use std::time::Duration;

use rill_core::{Cache as InternalCache, Context, Result};

/// A cache resource, valid for the duration of one
/// [`Resources::access_cache`](crate::Resources::access_cache) callback.
///
/// Exposes the data operations only. The resource's lifecycle belongs to the
/// manager that owns it.
pub struct Cache<'a> {
    inner: &'a dyn InternalCache,
}

impl<'a> Cache<'a> {
    pub(crate) fn new(inner: &'a dyn InternalCache) -> Self {
        Self { inner }
    }

    /// Fetch the value stored under `key`.
    ///
    /// Fails with [`Error::KeyNotFound`](crate::Error::KeyNotFound) when the
    /// key is absent or expired.
    pub async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>> {
        self.inner.get(ctx, key).await
    }

    /// Store `value` under `key`, replacing any previous value. `ttl`
    /// overrides the cache's default expiry when set.
    pub async fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: impl Into<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.inner.set(ctx, key, value.into(), ttl).await
    }

    /// Store `value` under `key` only if it is not already set.
    ///
    /// Fails with [`Error::KeyAlreadyExists`](crate::Error::KeyAlreadyExists)
    /// otherwise.
    pub async fn add(
        &self,
        ctx: &Context,
        key: &str,
        value: impl Into<Vec<u8>>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        self.inner.add(ctx, key, value.into(), ttl).await
    }

    /// Remove `key`. Removing a missing key succeeds.
    pub async fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        self.inner.delete(ctx, key).await
    }
}

impl fmt::Debug for Cache<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}
