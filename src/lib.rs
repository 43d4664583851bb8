//! # Corral
//!
//! In-process concurrency coordination primitives for applications that own
//! expensive resources and long-running work.
//!
//! Corral provides three independent, composable building blocks. Each is
//! usable standalone; a typical application runs a [`core::WorkerPool`]
//! whose work items borrow connections from a [`core::ResourcePool`], under
//! the supervision of a [`core::TaskRunner`] that enforces a deadline on the
//! overall run.
//!
//! ## The Primitives
//!
//! - **`ResourcePool`**: caps the number of *idle* closable resources (DB
//!   connections, file handles, sessions) while never making a caller wait.
//!   An empty pool manufactures a fresh resource instead of blocking.
//! - **`WorkerPool`**: a fixed set of OS threads consuming work items from a
//!   rendezvous conduit. Submission is throttled to consumption rate, and
//!   shutdown is a full-drain barrier.
//! - **`TaskRunner`**: executes registered steps strictly in order on a
//!   background thread, racing overall completion against a wall-clock
//!   deadline and an injectable interrupt.
//!
//! ## ResourcePool
//!
//! ```rust,ignore
//! use corral::config::ResourcePoolConfig;
//! use corral::core::{Resource, ResourcePool};
//!
//! struct Conn { /* ... */ }
//!
//! impl Resource for Conn {
//!     fn close(self) -> anyhow::Result<()> {
//!         // terminal release of the underlying handle
//!         Ok(())
//!     }
//! }
//!
//! let pool = ResourcePool::new(ResourcePoolConfig::with_capacity(4), || Ok(Conn {}))?;
//! let conn = pool.acquire()?;
//! // ... use the connection ...
//! pool.release(conn);
//! pool.shutdown();
//! ```
//!
//! ## WorkerPool
//!
//! ```rust,ignore
//! use corral::config::WorkerPoolConfig;
//! use corral::core::WorkerPool;
//!
//! let pool = WorkerPool::new(WorkerPoolConfig::new().with_worker_count(4))?;
//! for name in ["a", "b", "c"] {
//!     pool.submit(move || println!("processing {name}"))?;
//! }
//! pool.shutdown(); // blocks until every submitted item has run
//! ```
//!
//! ## TaskRunner
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use corral::core::TaskRunner;
//!
//! let mut runner = TaskRunner::new(Duration::from_secs(30));
//! let interrupt = runner.interrupt_handle(); // wire to ctrl-c, admin RPC, ...
//! runner.add(|step| println!("running step {step}"));
//! runner.add(|step| println!("running step {step}"));
//! match runner.start() {
//!     Ok(()) => println!("all steps completed"),
//!     Err(err) => eprintln!("run stopped early: {err}"),
//! }
//! ```
//!
//! ## Error Handling
//!
//! All failures are returned, never used for control flow. Caller-supplied
//! factory errors pass through [`core::PoolError::Factory`] verbatim; work
//! items have no return channel, so per-item error reporting belongs inside
//! the item closure.

#![deny(warnings)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core coordination primitives: resource pool, worker pool, task runner.
pub mod core;
/// Configuration models for pool construction.
pub mod config;
/// Shared utilities.
pub mod util;
