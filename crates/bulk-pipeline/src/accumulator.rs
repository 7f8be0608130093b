//! Single consumer grouping queued records into batches.

use crate::aggregator::ErrorAggregator;
use crate::batch::Batch;
use crate::error::PipelineError;
use crate::loader::BulkLoader;
use record_generator::Record;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What the consumer did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorReport {
    pub batches_loaded: u64,
    pub rows_loaded: u64,
    /// Records dropped with the partial batch on cancellation or failure.
    pub rows_discarded: u64,
    /// The queue was closed and fully flushed.
    pub drained: bool,
}

/// Pull records until the queue closes, inserting one batch per `batch_size`
/// records plus a final partial batch on drain.
///
/// Cancellation discards the batch being accumulated. An insert that has
/// already started is never interrupted, so its transaction always reaches
/// commit or rollback.
pub async fn accumulate<R, L>(
    mut queue: mpsc::Receiver<R>,
    loader: L,
    batch_size: usize,
    cancel: CancellationToken,
    errors: ErrorAggregator,
) -> AccumulatorReport
where
    R: Record,
    L: BulkLoader<R>,
{
    let mut report = AccumulatorReport::default();
    let mut batch = Batch::with_capacity(batch_size);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                report.rows_discarded = batch.len() as u64;
                debug!(pending = batch.len(), "Consumer cancelled, discarding partial batch");
                return report;
            }
            next = queue.recv() => next,
        };

        let Some(record) = next else {
            debug!(pending = batch.len(), "Queue closed, flushing remaining rows");
            if !batch.is_empty() && !flush(&loader, batch.take(), &mut report, &errors).await {
                return report;
            }
            report.drained = true;
            return report;
        };

        if let Some(full) = batch.add(record) {
            if !flush(&loader, full, &mut report, &errors).await {
                return report;
            }
        }
    }
}

/// Insert one batch. Returns `false` if the insert failed.
async fn flush<R, L>(
    loader: &L,
    batch: Batch<R>,
    report: &mut AccumulatorReport,
    errors: &ErrorAggregator,
) -> bool
where
    R: Record,
    L: BulkLoader<R>,
{
    debug!(table = R::TABLE, rows = batch.len(), "Inserting batch");

    match loader.insert(&batch).await {
        Ok(outcome) => {
            report.batches_loaded += 1;
            report.rows_loaded += batch.len() as u64;
            info!(
                table = R::TABLE,
                batch = report.batches_loaded,
                rows_affected = outcome.rows_affected,
                rows_loaded = report.rows_loaded,
                "Batch loaded"
            );
            true
        }
        Err(e) => {
            report.rows_discarded += batch.len() as u64;
            errors.report(PipelineError::Insert(e));
            false
        }
    }
}
