//! RAII lease over a registered resource

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Borrow-scoped handle to a named resource.
///
/// A lease keeps whatever permit the manager attached to it (typically a
/// registry read guard) alive until it is dropped, so the resource cannot be
/// replaced or removed while the lease exists. Keep leases short: registry
/// writers queue behind them.
pub struct Lease<T: ?Sized> {
    resource: Arc<T>,
    permit: Option<Box<dyn Any + Send + Sync>>,
}

impl<T: ?Sized> Lease<T> {
    /// Create a lease that holds `permit` until dropped.
    pub fn new<P>(resource: Arc<T>, permit: P) -> Self
    where
        P: Any + Send + Sync,
    {
        Self {
            resource,
            permit: Some(Box::new(permit)),
        }
    }

    #[cfg(test)]
    fn unguarded(resource: Arc<T>) -> Self {
        Self {
            resource,
            permit: None,
        }
    }

    /// Whether the lease is holding a permit.
    pub fn is_guarded(&self) -> bool {
        self.permit.is_some()
    }
}

impl<T: ?Sized> std::ops::Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T: ?Sized> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("guarded", &self.is_guarded())
            .finish_non_exhaustive()
    }
}
