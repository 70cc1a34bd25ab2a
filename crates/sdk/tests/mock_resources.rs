//! Tests of the configuration-free mock facade.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rill_sdk::{Context, Error, ResourceKind, Resources};
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn mock_has_a_stable_label_and_no_resources() {
    let res = Resources::mock();
    assert_eq!(res.label(), "mock");
    assert!(!res.has_cache("anything"));
    assert!(!res.has_rate_limit("anything"));
}

#[tokio::test]
async fn mock_access_reports_not_found_without_calling_back() {
    let res = Resources::mock();
    let called = Arc::new(AtomicBool::new(false));

    let flag = Arc::clone(&called);
    let err = res
        .access_cache(&Context::new(), "c", move |_cache| {
            Box::pin(async move { flag.store(true, Ordering::SeqCst) })
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            kind: ResourceKind::Cache,
            ..
        }
    ));

    let flag = Arc::clone(&called);
    let err = res
        .access_rate_limit(&Context::new(), "r", move |_rl| {
            Box::pin(async move { flag.store(true, Ordering::SeqCst) })
        })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(!called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn mock_access_honours_a_cancelled_context() {
    let ctx = Context::new();
    ctx.cancel();
    let err = Resources::mock()
        .access_cache(&ctx, "c", |_cache| Box::pin(async {}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn mock_logger_is_silent() {
    let out = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(out.clone())
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let res = Resources::mock();
    tracing::subscriber::with_default(subscriber, || {
        let logger = res.logger();
        logger.error("boom");
        logger.with(&[("k", "v")]).info("quiet");
    });

    assert!(out.contents().is_empty(), "{}", out.contents());
}

#[test]
fn mock_metrics_accept_every_call() {
    let metrics = Resources::mock().metrics();
    metrics.new_counter("c", &[]).incr(1);
    let gauge = metrics.new_gauge("g", &[("k", "v")]);
    gauge.set(5);
    gauge.incr(-1);
    metrics.new_timer("t", &[]).timing(Duration::from_millis(1));
}
