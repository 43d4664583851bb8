//! Pool configuration structures.

use serde::{Deserialize, Serialize};

/// Resource pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePoolConfig {
    /// Maximum number of idle resources retained by the pool. A hard cap on
    /// idle resources, not on concurrently-live ones.
    pub capacity: usize,
}

impl ResourcePoolConfig {
    /// Create a configuration holding at most `capacity` idle resources.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        Ok(())
    }
}

/// Worker pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Number of worker threads to run. Fixed for the pool's lifetime.
    pub worker_count: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
        }
    }
}

impl WorkerPoolConfig {
    /// Create a configuration with one worker per available CPU.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    #[must_use]
    pub const fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.worker_count == 0 {
            return Err("worker_count must be greater than 0".into());
        }
        Ok(())
    }
}

/// Root toolkit configuration for applications wiring both pools from a
/// single config document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitConfig {
    /// Resource pool settings.
    pub resource_pool: ResourcePoolConfig,
    /// Worker pool settings.
    pub worker_pool: WorkerPoolConfig,
}

impl ToolkitConfig {
    /// Validate all sections.
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid section.
    pub fn validate(&self) -> Result<(), String> {
        self.resource_pool
            .validate()
            .map_err(|e| format!("resource_pool invalid: {e}"))?;
        self.worker_pool
            .validate()
            .map_err(|e| format!("worker_pool invalid: {e}"))?;
        Ok(())
    }

    /// Parse a toolkit configuration from a JSON string and validate it.
    ///
    /// # Errors
    ///
    /// Returns a message for either a parse failure or an invalid value.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
