//! # Rill Core
//!
//! Vocabulary shared by every Rill crate that touches named resources.
//!
//! - [`Context`] -- cancellation and deadline carried by every blocking call
//! - [`Error`] / [`Result`] -- the single error taxonomy for resource access
//! - [`Cache`] / [`RateLimit`] -- the engine-side capability traits that
//!   managers store and that the public SDK wraps
//! - [`ResourceKind`] -- the namespace a named resource lives in
//!
//! These are internal interfaces: component authors reach them only through
//! the adapter types in `rill-sdk`, so the traits here are free to grow.

pub mod cache;
pub mod context;
pub mod error;
pub mod kind;
pub mod ratelimit;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{Cache, TtlItem};
pub use context::Context;
pub use error::{Error, Result};
pub use kind::ResourceKind;
pub use ratelimit::RateLimit;
