//! Core coordination primitives and their error taxonomy.

pub mod error;
pub mod resource_pool;
pub mod runner;
pub mod worker_pool;

pub use error::{PoolError, RunError};
pub use resource_pool::{Resource, ResourcePool};
pub use runner::{InterruptHandle, TaskRunner};
pub use worker_pool::{PoolStats, WorkItem, WorkerPool};
