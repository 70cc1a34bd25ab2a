//! Engine-side rate limit capability

use std::time::Duration;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// Rate limit capability as implemented by engine rate limit resources.
#[async_trait]
pub trait RateLimit: Send + Sync {
    /// Ask for permission to perform one rate limited action.
    ///
    /// Returns how long the caller should wait before retrying. A zero
    /// duration means the action is admitted now.
    async fn access(&self, ctx: &Context) -> Result<Duration>;

    /// Release any held state. Called by the manager when the resource is
    /// removed or replaced.
    async fn close(&self, ctx: &Context) -> Result<()>;
}
