//! Bounded pool of caller-defined closable resources.
//!
//! The pool caps how many *idle* resources it retains, not how many can be
//! live at once. [`ResourcePool::acquire`] never blocks: when the idle
//! buffer is empty a fresh resource is manufactured by the caller-supplied
//! factory, trading creation cost for callers never stalling. Resources
//! returned beyond capacity are destroyed rather than retained.
//!
//! # Design
//!
//! - **Lock-free acquire**: the idle buffer is a bounded channel whose own
//!   synchronization carries concurrent acquire/release races.
//! - **One lock**: a single mutex makes `release` and `shutdown` mutually
//!   exclusive; it guards only the closed transition and the intake sender.
//! - **Intake closes before drain**: `shutdown` drops the intake sender
//!   under the lock before draining, so no release can enqueue behind the
//!   drain.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::ResourcePoolConfig;
use crate::core::PoolError;

/// An expensive, closable capability managed by a [`ResourcePool`].
///
/// Ownership is exclusive: a resource is held by the pool or by the caller
/// that acquired it, never both. `close` is the terminal release operation,
/// invoked exactly once per resource over its lifetime.
pub trait Resource: Send + 'static {
    /// Release the underlying resource.
    ///
    /// # Errors
    ///
    /// Implementations may fail; the pool logs and continues. A failing
    /// close never blocks reclamation of other resources.
    fn close(self) -> anyhow::Result<()>;
}

/// Pool of reusable resources shared safely by any number of threads.
///
/// Created with a fixed idle capacity and a factory; destroyed exactly once
/// by [`ResourcePool::shutdown`] (also invoked on drop), which drains and
/// destroys every idle resource.
pub struct ResourcePool<R: Resource> {
    /// Manufactures a resource when no idle one is available.
    factory: Box<dyn Fn() -> anyhow::Result<R> + Send + Sync>,
    /// Receive side of the idle buffer. Read by `acquire` without a lock.
    idle: Receiver<R>,
    /// Intake side of the idle buffer. `None` marks the pool closed; the
    /// mutex makes `release` and `shutdown` mutually exclusive.
    intake: Mutex<Option<Sender<R>>>,
}

impl<R: Resource> ResourcePool<R> {
    /// Create a pool retaining at most `config.capacity` idle resources.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] if the capacity is zero.
    pub fn new<F>(config: ResourcePoolConfig, factory: F) -> Result<Self, PoolError>
    where
        F: Fn() -> anyhow::Result<R> + Send + Sync + 'static,
    {
        config.validate().map_err(PoolError::InvalidConfiguration)?;

        let (intake, idle) = bounded(config.capacity);
        info!(capacity = config.capacity, "resource pool created");

        Ok(Self {
            factory: Box::new(factory),
            idle,
            intake: Mutex::new(Some(intake)),
        })
    }

    /// Retrieve a resource, reusing an idle one when available and
    /// manufacturing a new one otherwise. Never blocks waiting for capacity.
    ///
    /// # Errors
    ///
    /// - [`PoolError::PoolClosed`] if the pool has been shut down.
    /// - [`PoolError::Factory`] carrying the factory's error verbatim.
    pub fn acquire(&self) -> Result<R, PoolError> {
        match self.idle.try_recv() {
            Ok(resource) => {
                debug!("acquire: reusing idle resource");
                Ok(resource)
            }
            Err(TryRecvError::Empty) => {
                debug!("acquire: manufacturing new resource");
                (self.factory)().map_err(PoolError::Factory)
            }
            Err(TryRecvError::Disconnected) => Err(PoolError::PoolClosed),
        }
    }

    /// Return a previously acquired resource.
    ///
    /// If the pool has been shut down, or the idle buffer is already at
    /// capacity, the resource is destroyed instead of retained.
    pub fn release(&self, resource: R) {
        // Mutually exclusive with shutdown.
        let intake = self.intake.lock();

        let Some(tx) = intake.as_ref() else {
            debug!("release: pool closed, destroying resource");
            destroy(resource);
            return;
        };

        match tx.try_send(resource) {
            Ok(()) => debug!("release: resource retained in idle buffer"),
            Err(TrySendError::Full(resource)) => {
                debug!("release: idle buffer at capacity, destroying resource");
                destroy(resource);
            }
            // Unreachable while we hold a live sender, but a destroyed
            // resource is the correct outcome either way.
            Err(TrySendError::Disconnected(resource)) => destroy(resource),
        }
    }

    /// Shut the pool down, destroying every idle resource. Idempotent.
    pub fn shutdown(&self) {
        // Mutually exclusive with release.
        let mut intake = self.intake.lock();

        let Some(tx) = intake.take() else {
            debug!("shutdown: pool already closed");
            return;
        };

        // Close the intake before draining; a sender surviving the drain
        // would let a later release re-enqueue into a dead pool.
        drop(tx);

        let mut drained = 0_usize;
        while let Ok(resource) = self.idle.try_recv() {
            destroy(resource);
            drained += 1;
        }

        info!(drained, "resource pool shut down");
    }

    /// Number of resources currently sitting idle in the pool.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }
}

impl<R: Resource> Drop for ResourcePool<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Invoke a resource's terminal release, logging (not propagating) failure.
fn destroy<R: Resource>(resource: R) {
    if let Err(err) = resource.close() {
        warn!(error = %err, "resource close failed");
    }
}
