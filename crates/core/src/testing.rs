//! In-memory capability doubles for tests.
//!
//! Enabled with the `testing` feature. These are deliberately simple: they
//! honour the capability contracts closely enough to exercise managers and
//! adapters, and record enough state to assert on afterwards.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::cache::Cache;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::ratelimit::RateLimit;

#[derive(Debug, Clone)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// A `HashMap`-backed cache with TTL support.
///
/// Operations fail with [`Error::Backend`] once the cache is closed, which
/// lets tests detect use of a resource after the manager released it.
#[derive(Debug)]
pub struct MemoryCache {
    name: String,
    default_ttl: Option<Duration>,
    items: Mutex<HashMap<String, Entry>>,
    closed: AtomicBool,
}

impl MemoryCache {
    /// Create an empty cache with no default TTL.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_ttl: None,
            items: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Apply `ttl` to writes that do not carry their own.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Whether [`Cache::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::backend(&self.name, "cache is closed"));
        }
        Ok(())
    }

    fn entry(&self, value: Vec<u8>, ttl: Option<Duration>) -> Entry {
        Entry {
            value,
            expires_at: ttl.or(self.default_ttl).map(|ttl| Instant::now() + ttl),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, ctx: &Context, key: &str) -> Result<Vec<u8>> {
        ctx.check()?;
        self.ensure_open()?;
        let now = Instant::now();
        self.items
            .lock()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
            .ok_or_else(|| Error::KeyNotFound {
                key: key.to_owned(),
            })
    }

    async fn set(
        &self,
        ctx: &Context,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        ctx.check()?;
        self.ensure_open()?;
        let entry = self.entry(value, ttl);
        self.items.lock().insert(key.to_owned(), entry);
        Ok(())
    }

    async fn add(
        &self,
        ctx: &Context,
        key: &str,
        value: Vec<u8>,
        ttl: Option<Duration>,
    ) -> Result<()> {
        ctx.check()?;
        self.ensure_open()?;
        let now = Instant::now();
        let entry = self.entry(value, ttl);
        let mut items = self.items.lock();
        if items.get(key).is_some_and(|existing| existing.is_live(now)) {
            return Err(Error::KeyAlreadyExists {
                key: key.to_owned(),
            });
        }
        items.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check()?;
        self.ensure_open()?;
        self.items.lock().remove(key);
        Ok(())
    }

    async fn close(&self, _ctx: &Context) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.items.lock().clear();
        Ok(())
    }
}

/// A rate limit that admits a fixed number of accesses, then asks callers to
/// wait a fixed duration.
#[derive(Debug)]
pub struct FixedRateLimit {
    capacity: u64,
    wait: Duration,
    accesses: AtomicU64,
    closed: AtomicBool,
}

impl FixedRateLimit {
    /// Admit `capacity` accesses, then report `wait` for every later one.
    pub fn new(capacity: u64, wait: Duration) -> Self {
        Self {
            capacity,
            wait,
            accesses: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Admit every access.
    pub fn unlimited() -> Self {
        Self::new(u64::MAX, Duration::ZERO)
    }

    /// Number of accesses seen so far.
    pub fn accesses(&self) -> u64 {
        self.accesses.load(Ordering::SeqCst)
    }

    /// Whether [`RateLimit::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimit for FixedRateLimit {
    async fn access(&self, ctx: &Context) -> Result<Duration> {
        ctx.check()?;
        if self.is_closed() {
            return Err(Error::backend("fixed", "rate limit is closed"));
        }
        let seen = self.accesses.fetch_add(1, Ordering::SeqCst);
        if seen < self.capacity {
            Ok(Duration::ZERO)
        } else {
            Ok(self.wait)
        }
    }

    async fn close(&self, _ctx: &Context) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn memory_cache_add_rejects_live_key() {
        let ctx = Context::new();
        let cache = MemoryCache::new("c");
        cache.add(&ctx, "k", b"a".to_vec(), None).await.unwrap();
        let err = cache.add(&ctx, "k", b"b".to_vec(), None).await.unwrap_err();
        assert!(matches!(err, Error::KeyAlreadyExists { .. }));
        assert_eq!(cache.get(&ctx, "k").await.unwrap(), b"a".to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn memory_cache_expires_entries() {
        let ctx = Context::new();
        let cache = MemoryCache::new("c").with_default_ttl(Duration::from_secs(1));
        cache.set(&ctx, "k", b"v".to_vec(), None).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        let err = cache.get(&ctx, "k").await.unwrap_err();
        assert!(err.is_not_found());
        // an expired key can be added again
        cache.add(&ctx, "k", b"w".to_vec(), None).await.unwrap();
    }

    #[tokio::test]
    async fn closed_cache_rejects_operations() {
        let ctx = Context::new();
        let cache = MemoryCache::new("c");
        cache.close(&ctx).await.unwrap();
        assert!(cache.is_closed());
        assert!(matches!(
            cache.get(&ctx, "k").await,
            Err(Error::Backend { .. })
        ));
    }

    #[tokio::test]
    async fn fixed_rate_limit_admits_capacity_then_waits() {
        let ctx = Context::new();
        let limit = FixedRateLimit::new(2, Duration::from_millis(250));
        assert_eq!(limit.access(&ctx).await.unwrap(), Duration::ZERO);
        assert_eq!(limit.access(&ctx).await.unwrap(), Duration::ZERO);
        assert_eq!(
            limit.access(&ctx).await.unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(limit.accesses(), 3);
    }
}
