//! # Rill Resource Management
//!
//! The engine side of named resource access. A [`Manager`] owns one registry
//! per resource kind (caches, rate limits), serializes create/update/delete
//! against it, and hands out borrow-scoped [`Lease`]s to readers. Each
//! component gets its own manager view carrying a label, logger and metrics,
//! while all views of one manager share the registries.
//!
//! Component code does not use this crate directly: it talks to the
//! [`Management`] trait through the `rill-sdk` facade. [`MockManager`] is a
//! configuration-free stand-in for tests.

pub mod config;
pub mod lease;
pub mod management;
pub mod manager;
pub mod mock;
pub mod path;
pub mod registry;

pub use config::{LoggerConfig, ManagerConfig, MetricsConfig};
pub use lease::Lease;
pub use management::Management;
pub use manager::Manager;
pub use mock::MockManager;
pub use path::ComponentPath;
pub use registry::Registry;
