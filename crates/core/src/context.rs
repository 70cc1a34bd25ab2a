//! Call context with cancellation and deadline support

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Context for blocking resource operations.
///
/// Carries a cooperative cancellation token and an optional deadline. Every
/// call that may wait on the resource registry races its wait against this
/// context and gives up as soon as either fires.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Cooperative cancellation token.
    pub cancellation: CancellationToken,
    /// Point in time after which waiting operations fail with
    /// [`Error::DeadlineExceeded`].
    pub deadline: Option<Instant>,
}

impl Context {
    /// Create a context that is never cancelled and has no deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default cancellation token with the provided one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Cancel this context and every clone sharing its token.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Fail fast if the context has already ended.
    ///
    /// Cancellation is reported before an elapsed deadline.
    pub fn check(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => Err(Error::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Wait until the context ends and report why.
    pub async fn done(&self) -> Error {
        match self.deadline {
            Some(deadline) => tokio::select! {
                () = self.cancellation.cancelled() => Error::Cancelled,
                () = tokio::time::sleep_until(deadline) => Error::DeadlineExceeded,
            },
            None => {
                self.cancellation.cancelled().await;
                Error::Cancelled
            }
        }
    }

    /// Drive `fut` to completion unless the context ends first.
    ///
    /// An already ended context never polls `fut`.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        self.check()?;
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn fresh_context_is_live() {
        let ctx = Context::new();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline.is_none());
    }

    #[test]
    fn cancelled_context_fails_check() {
        let token = CancellationToken::new();
        let ctx = Context::new().with_cancellation(token.child_token());
        assert!(ctx.check().is_ok());
        token.cancel();
        assert!(matches!(ctx.check(), Err(Error::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_deadline_fails_check() {
        let ctx = Context::new().with_timeout(Duration::from_millis(10));
        assert!(ctx.check().is_ok());
        tokio::time::sleep(Duration::from_millis(11)).await;
        assert!(matches!(ctx.check(), Err(Error::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn run_never_polls_after_cancel() {
        let ctx = Context::new();
        ctx.cancel();
        let polled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&polled);
        let result = ctx
            .run(async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn run_returns_deadline_while_waiting() {
        let ctx = Context::new().with_timeout(Duration::from_millis(50));
        let result = ctx.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(Error::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn run_returns_output_when_ready() {
        let ctx = Context::new();
        let out = ctx.run(async { 7 }).await.unwrap();
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn cancel_while_waiting_wakes_run() {
        let ctx = Context::new();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.run(std::future::pending::<()>()).await });
        tokio::task::yield_now().await;
        ctx.cancel();
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
