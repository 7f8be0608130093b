//! Producer workers feeding the bounded queue.

use crate::aggregator::ErrorAggregator;
use crate::error::PipelineError;
use record_generator::RecordFactory;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What one producer worker did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    pub worker: usize,
    /// Records returned by the factory.
    pub generated: u64,
    /// Records accepted by the queue.
    pub pushed: u64,
    /// Stopped early because the pipeline was cancelled or the queue closed.
    pub cancelled: bool,
}

/// Generate `count` records and push each onto `queue`.
///
/// A push waits while the queue is full and gives up, discarding the record,
/// as soon as `cancel` fires. A generation failure is reported and stops
/// this worker only; the aggregator decides what happens to the rest.
pub async fn produce<F: RecordFactory>(
    worker: usize,
    mut factory: F,
    count: u64,
    queue: mpsc::Sender<F::Record>,
    cancel: CancellationToken,
    errors: ErrorAggregator,
) -> ProducerReport {
    let mut report = ProducerReport {
        worker,
        ..Default::default()
    };

    for _ in 0..count {
        let record = match factory.create() {
            Ok(record) => record,
            Err(source) => {
                errors.report(PipelineError::Generation { worker, source });
                return report;
            }
        };
        report.generated += 1;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(worker, generated = report.generated, "Producer cancelled, discarding record");
                report.cancelled = true;
                return report;
            }
            sent = queue.send(record) => {
                if sent.is_err() {
                    debug!(worker, "Queue closed by consumer, stopping producer");
                    report.cancelled = true;
                    return report;
                }
                report.pushed += 1;
            }
        }
    }

    debug!(worker, generated = report.generated, "Producer finished");
    report
}
