//! Concurrent generate-and-bulk-load pipeline.
//!
//! ```text
//!  worker 0 ─┐
//!  worker 1 ─┼─▶ bounded queue (capacity = batch size) ─▶ accumulator ─▶ BulkLoader ─▶ store
//!  worker N ─┘                                              │
//!                                                    one transaction per batch
//! ```
//!
//! - Producers each own a [`RecordFactory`](record_generator::RecordFactory)
//!   and generate `floor(num_records / num_workers)` records.
//! - The queue is the only backpressure mechanism: a full queue suspends
//!   producers until the consumer makes room.
//! - The accumulator inserts a batch as soon as it holds `batch_size` records
//!   and flushes the partial remainder when the queue closes.
//! - Every batch is inserted in its own transaction; it is either fully
//!   visible afterwards or not at all.
//! - A shared [`CancellationToken`](tokio_util::sync::CancellationToken) is
//!   observed at every queue suspension point. The first error reported to
//!   the [`ErrorAggregator`] cancels it.

pub mod accumulator;
pub mod aggregator;
pub mod batch;
pub mod config;
pub mod error;
pub mod loader;
pub mod memory;
pub mod pipeline;
pub mod producer;
pub mod store;

pub use accumulator::AccumulatorReport;
pub use aggregator::ErrorAggregator;
pub use batch::Batch;
pub use config::{ConfigError, PipelineConfig, MAX_BATCH_SIZE};
pub use error::{InsertError, PipelineError, StoreError};
pub use loader::{BulkLoader, TransactionGuard, TransactionalLoader};
pub use memory::{MemoryStore, MemoryStoreStats};
pub use pipeline::{Pipeline, PipelineOutcome, PipelineReport, PipelineState, PipelineSummary};
pub use producer::ProducerReport;
pub use store::{InsertOutcome, InsertStatement, StoreTransaction, TransactionalStore};
