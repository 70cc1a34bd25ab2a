//! Borrow-scoped rate limit view.

use std::fmt;
use std::time::Duration;

use rill_core::{Context, RateLimit as InternalRateLimit, Result};

/// A rate limit resource, valid for the duration of one
/// [`Resources::access_rate_limit`](crate::Resources::access_rate_limit)
/// callback.
pub struct RateLimit<'a> {
    inner: &'a dyn InternalRateLimit,
}

impl<'a> RateLimit<'a> {
    pub(crate) fn new(inner: &'a dyn InternalRateLimit) -> Self {
        Self { inner }
    }

    /// Ask for permission to perform one rate limited action.
    ///
    /// Returns how long to wait before trying again; zero means go ahead now.
    pub async fn access(&self, ctx: &Context) -> Result<Duration> {
        self.inner.access(ctx).await
    }
}

impl fmt::Debug for RateLimit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimit").finish_non_exhaustive()
    }
}
