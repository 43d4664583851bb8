//! Error types for pool and runner operations.

use thiserror::Error;

/// Errors produced by the pooling primitives.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Construction-time misuse (zero capacity or worker count).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Operation attempted on a pool that has been shut down.
    #[error("pool has been closed")]
    PoolClosed,
    /// Failure propagated verbatim from a caller-supplied factory.
    #[error(transparent)]
    Factory(#[from] anyhow::Error),
}

/// Terminal causes that stop a task runner before all steps complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RunError {
    /// The deadline elapsed before the last step finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// An interrupt was observed at a step boundary.
    #[error("interrupt received")]
    Interrupted,
}
