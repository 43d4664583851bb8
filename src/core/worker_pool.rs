//! Fixed-size pool of worker threads consuming opaque work items.
//!
//! The pool spawns exactly N OS threads at construction. Work items travel
//! over a rendezvous conduit: [`WorkerPool::submit`] blocks until a worker
//! is ready to take the item, which throttles submission rate to
//! consumption rate. [`WorkerPool::shutdown`] closes the conduit and joins
//! every worker, guaranteeing no item is abandoned mid-flight.
//!
//! # Failure Semantics
//!
//! A work item that panics is *not* caught by the pool; it takes its worker
//! thread down with it. Items have no return channel, so callers needing
//! per-item error reporting must capture errors inside the item itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::WorkerPoolConfig;
use crate::core::PoolError;

/// A unit of work executable by a [`WorkerPool`].
///
/// The pool never inspects results; it only invokes the item exactly once.
pub trait WorkItem: Send {
    /// Execute the unit of work, consuming the item.
    fn task(self: Box<Self>);
}

/// Any sendable one-shot closure is a work item.
impl<F> WorkItem for F
where
    F: FnOnce() + Send,
{
    fn task(self: Box<Self>) {
        (*self)();
    }
}

/// Statistics about pool utilization.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of worker threads.
    pub worker_count: usize,
    /// Total items accepted by `submit`.
    pub submitted_tasks: u64,
    /// Total items whose task has finished executing.
    pub completed_tasks: u64,
}

/// Internal counters for pool statistics (lock-free atomics).
#[derive(Debug, Default)]
struct PoolCounters {
    submitted: AtomicU64,
    completed: AtomicU64,
}

/// Pool of worker threads that execute any submitted [`WorkItem`].
pub struct WorkerPool {
    /// Conduit intake. `None` marks the pool shut down; dropping the sender
    /// is what lets idle workers observe closure and exit.
    conduit: Mutex<Option<Sender<Box<dyn WorkItem>>>>,
    /// Worker thread handles, joined by `shutdown`.
    workers: Mutex<Vec<JoinHandle<()>>>,
    counters: Arc<PoolCounters>,
    worker_count: usize,
}

impl WorkerPool {
    /// Create a pool and immediately start `config.worker_count` workers.
    ///
    /// Each worker loops pulling items from the shared conduit until the
    /// conduit is closed and drained, then terminates.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] if the worker count is
    /// zero.
    pub fn new(config: WorkerPoolConfig) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidConfiguration)?;

        // Rendezvous conduit: a send completes only when a worker receives.
        let (conduit_tx, conduit_rx) = bounded::<Box<dyn WorkItem>>(0);
        let counters = Arc::new(PoolCounters::default());

        let mut workers = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            let rx = conduit_rx.clone();
            let counters = Arc::clone(&counters);

            let handle = thread::Builder::new()
                .name(format!("corral-worker-{worker_id}"))
                .spawn(move || {
                    debug!(worker_id, "worker started");
                    // Blocks for each item; ends when the conduit is closed
                    // and drained.
                    for item in &rx {
                        item.task();
                        counters.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    debug!(worker_id, "conduit closed, worker exiting");
                })
                .expect("failed to spawn worker thread");

            workers.push(handle);
        }

        info!(worker_count = config.worker_count, "worker pool started");

        Ok(Self {
            conduit: Mutex::new(Some(conduit_tx)),
            workers: Mutex::new(workers),
            counters,
            worker_count: config.worker_count,
        })
    }

    /// Enqueue a work item, blocking until a worker is ready to take it.
    ///
    /// Blocking is the intended backpressure mechanism: when every worker
    /// is busy the submitter waits for one to free up.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolClosed`] if the pool has been shut down.
    pub fn submit<W>(&self, item: W) -> Result<(), PoolError>
    where
        W: WorkItem + 'static,
    {
        // Clone the sender out of the lock so a blocked send cannot stall
        // a concurrent shutdown. Workers keep running until this clone is
        // gone, so an in-flight submit is never abandoned.
        let tx = self.conduit.lock().clone();
        let Some(tx) = tx else {
            return Err(PoolError::PoolClosed);
        };

        tx.send(Box::new(item)).map_err(|_| PoolError::PoolClosed)?;
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Close the conduit and block until every worker has drained it and
    /// exited. Idempotent.
    ///
    /// No submitted item is abandoned: every item accepted before shutdown
    /// has finished executing by the time this returns.
    pub fn shutdown(&self) {
        let Some(tx) = self.conduit.lock().take() else {
            debug!("shutdown: worker pool already closed");
            return;
        };
        drop(tx);

        info!("worker pool draining");
        let mut workers = self.workers.lock();
        for (worker_id, handle) in workers.drain(..).enumerate() {
            if handle.join().is_err() {
                warn!(worker_id, "worker thread panicked");
            }
        }
        info!(worker_count = self.worker_count, "worker pool shut down");
    }

    /// Get current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            worker_count: self.worker_count,
            submitted_tasks: self.counters.submitted.load(Ordering::Relaxed),
            completed_tasks: self.counters.completed.load(Ordering::Relaxed),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Close the conduit but do not join; explicit shutdown() is the
        // graceful path. Detached workers exit once the conduit drains.
        if self.conduit.lock().take().is_some() {
            debug!("worker pool dropped without explicit shutdown, workers detached");
        }
    }
}
