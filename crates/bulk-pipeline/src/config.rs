//! Pipeline sizing configuration.

use thiserror::Error;

/// Largest accepted batch size. Bounds both the queue capacity and the
/// memory reserved for one batch.
pub const MAX_BATCH_SIZE: usize = 1_000_000;

/// Invalid pipeline configuration. Fatal: the pipeline never starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    #[error("batch size {0} exceeds the maximum of {max}", max = MAX_BATCH_SIZE)]
    BatchSizeTooLarge(usize),

    #[error("number of workers must be at least 1")]
    ZeroWorkers,
}

/// Immutable sizing of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    batch_size: usize,
    num_workers: usize,
    num_records: u64,
}

impl PipelineConfig {
    pub fn new(
        batch_size: usize,
        num_workers: usize,
        num_records: u64,
    ) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if batch_size > MAX_BATCH_SIZE {
            return Err(ConfigError::BatchSizeTooLarge(batch_size));
        }
        if num_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(Self {
            batch_size,
            num_workers,
            num_records,
        })
    }

    /// Rows per INSERT, also the capacity of the hand-off queue.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Requested record count, before per-worker truncation.
    pub fn num_records(&self) -> u64 {
        self.num_records
    }

    /// Records each worker generates: `floor(num_records / num_workers)`.
    pub fn records_per_worker(&self) -> u64 {
        self.num_records / self.num_workers as u64
    }

    /// Records actually generated by a full run.
    ///
    /// Less than `num_records` whenever the worker count does not divide it;
    /// the remainder is never generated.
    pub fn total_records(&self) -> u64 {
        self.records_per_worker() * self.num_workers as u64
    }
}
