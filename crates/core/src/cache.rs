//! Engine-side cache capability

use std::time::Duration;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// A key/value pair with an optional per-item TTL, used for batched writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlItem {
    /// Cache key.
    pub key: String,
    /// Stored bytes.
    pub value: Vec<u8>,
    /// Expiry override; `None` uses the cache default.
    pub ttl: Option<Duration>,
}

/// Cache capability as implemented by engine cache resources.
///
/// Managers store `Arc<dyn Cache>` values. Component code never sees this
/// trait directly; it goes through the SDK's cache adapter, which exposes
/// only the data operations.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// Returns [`Error::KeyNotFound`](crate::Error::KeyNotFound) when absent.
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, ctx: &Context, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<()>;

    /// Store several items.
    async fn set_multi(&self, ctx: &Context, items: Vec<TtlItem>) -> Result<()> {
        for item in items {
            self.set(ctx, &item.key, item.value, item.ttl).await?;
        }
        Ok(())
    }

    /// Store `value` under `key` only if the key is absent.
    ///
    /// Returns [`Error::KeyAlreadyExists`](crate::Error::KeyAlreadyExists)
    /// when a live value is present.
    async fn add(&self, ctx: &Context, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<()>;

    /// Remove `key`. Deleting a missing key succeeds.
    async fn delete(&self, ctx: &Context, key: &str) -> Result<()>;

    /// Release any held connections. Called by the manager when the resource
    /// is removed or replaced.
    async fn close(&self, ctx: &Context) -> Result<()>;
}
