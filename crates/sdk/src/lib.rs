#![warn(missing_docs)]

//! # Rill SDK
//!
//! The stable surface component authors build against.
//!
//! A component receives a [`Resources`] handle and reaches everything shared
//! through it: its [`label`](Resources::label), a preset [`Logger`], a
//! [`Metrics`] recorder, and borrow-scoped access to named caches and rate
//! limits.
//!
//! Every type here is an adapter over an engine-side interface. The engine's
//! traits may grow, shrink or change shape; only the adapters in this crate
//! follow them, so component code does not have to.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rill_sdk::{Context, Resources};
//!
//! async fn dedupe(res: &Resources, ctx: &Context, id: &str) -> rill_sdk::Result<bool> {
//!     let (op_ctx, id) = (ctx.clone(), id.to_owned());
//!     res.access_cache(ctx, "seen", move |cache| {
//!         Box::pin(async move { cache.add(&op_ctx, &id, b"1".to_vec(), None).await.is_ok() })
//!     })
//!     .await
//! }
//! ```
//!
//! Callback futures are boxed and must be valid for the borrow of the view
//! they receive, so they capture owned values (clone the [`Context`] in)
//! rather than references into the caller's stack.

mod cache;
mod logger;
mod metrics;
mod ratelimit;
mod resources;

pub use cache::Cache;
pub use logger::Logger;
pub use metrics::{MetricCounter, MetricGauge, MetricTimer, Metrics};
pub use ratelimit::RateLimit;
pub use resources::Resources;

pub use futures::future::BoxFuture;
pub use rill_core::{Context, Error, ResourceKind, Result};
