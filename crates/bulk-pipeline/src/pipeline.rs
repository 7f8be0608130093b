//! Pipeline orchestration: producers → bounded queue → accumulator → loader.

use crate::accumulator::{accumulate, AccumulatorReport};
use crate::aggregator::ErrorAggregator;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::loader::BulkLoader;
use crate::producer::{produce, ProducerReport};
use record_generator::{Record, RecordFactory};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Instrument};

/// Lifecycle of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    /// Queue closed, last batch being flushed.
    Draining,
    Completed,
    /// First error or external stop observed; no further flush.
    Cancelling,
    Terminated,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Running => "running",
            PipelineState::Draining => "draining",
            PipelineState::Completed => "completed",
            PipelineState::Cancelling => "cancelling",
            PipelineState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum PipelineOutcome {
    Completed,
    Cancelled,
    Failed(PipelineError),
}

/// Metrics and outcome of one run.
#[derive(Debug)]
pub struct PipelineReport {
    pub outcome: PipelineOutcome,
    pub records_generated: u64,
    pub records_pushed: u64,
    pub batches_loaded: u64,
    pub rows_loaded: u64,
    pub rows_discarded: u64,
    /// Errors dropped because an earlier one had already been captured.
    pub errors_dropped: u64,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.rows_loaded as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, PipelineOutcome::Completed)
    }

    /// `Ok` only for a completed run; cancellation becomes [`PipelineError::Cancelled`].
    pub fn into_result(self) -> Result<PipelineSummary, PipelineError> {
        match self.outcome {
            PipelineOutcome::Completed => Ok(PipelineSummary {
                records_generated: self.records_generated,
                batches_loaded: self.batches_loaded,
                rows_loaded: self.rows_loaded,
                elapsed: self.elapsed,
            }),
            PipelineOutcome::Cancelled => Err(PipelineError::Cancelled),
            PipelineOutcome::Failed(e) => Err(e),
        }
    }
}

/// Metrics of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSummary {
    pub records_generated: u64,
    pub batches_loaded: u64,
    pub rows_loaded: u64,
    pub elapsed: Duration,
}

/// One generate-and-load run.
pub struct Pipeline {
    config: PipelineConfig,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "Pipeline state change");
        self.state = next;
    }

    /// Run the pipeline to completion, cancellation or first failure.
    ///
    /// `make_factory(i)` builds the record factory owned by worker `i`.
    /// Cancelling `cancel` stops every producer and the consumer at their
    /// next suspension point.
    pub async fn run<F, M, L>(
        &mut self,
        make_factory: M,
        loader: L,
        cancel: CancellationToken,
    ) -> PipelineReport
    where
        F: RecordFactory,
        M: Fn(usize) -> F,
        L: BulkLoader<F::Record>,
    {
        let start = Instant::now();
        let config = self.config;
        let (errors, mut first_error) = ErrorAggregator::new(cancel.clone());
        let (queue_tx, queue_rx) = mpsc::channel::<F::Record>(config.batch_size());

        info!(
            table = F::Record::TABLE,
            batch_size = config.batch_size(),
            num_workers = config.num_workers(),
            num_records = config.num_records(),
            total_records = config.total_records(),
            "Starting pipeline"
        );
        self.transition(PipelineState::Running);

        let consumer = tokio::spawn(
            accumulate(
                queue_rx,
                loader,
                config.batch_size(),
                cancel.clone(),
                errors.clone(),
            )
            .in_current_span(),
        );

        let mut producers = JoinSet::new();
        for worker in 0..config.num_workers() {
            producers.spawn(
                produce(
                    worker,
                    make_factory(worker),
                    config.records_per_worker(),
                    queue_tx.clone(),
                    cancel.clone(),
                    errors.clone(),
                )
                .in_current_span(),
            );
        }

        let mut produced = Vec::with_capacity(config.num_workers());
        while let Some(joined) = producers.join_next().await {
            match joined {
                Ok(report) => produced.push(report),
                Err(e) => {
                    errors.report(task_failed("producer", e));
                }
            }
        }

        // every producer has terminated; closing the queue lets the consumer drain
        drop(queue_tx);
        if cancel.is_cancelled() {
            self.transition(PipelineState::Cancelling);
        } else {
            self.transition(PipelineState::Draining);
        }

        let consumed = match consumer.await {
            Ok(report) => report,
            Err(e) => {
                errors.report(task_failed("consumer", e));
                AccumulatorReport::default()
            }
        };
        drop(errors);

        let outcome = match first_error.take() {
            Some(e) => PipelineOutcome::Failed(e),
            None if consumed.drained && produced.iter().all(|p| !p.cancelled) => {
                PipelineOutcome::Completed
            }
            None => PipelineOutcome::Cancelled,
        };

        match outcome {
            PipelineOutcome::Completed => self.transition(PipelineState::Completed),
            _ => {
                if self.state != PipelineState::Cancelling {
                    self.transition(PipelineState::Cancelling);
                }
                self.transition(PipelineState::Terminated);
            }
        }

        let report = build_report(outcome, &produced, &consumed, first_error.dropped(), start);
        info!(
            state = %self.state,
            records_generated = report.records_generated,
            batches_loaded = report.batches_loaded,
            rows_loaded = report.rows_loaded,
            rows_discarded = report.rows_discarded,
            elapsed = ?report.elapsed,
            "Pipeline finished"
        );
        report
    }
}

fn task_failed(task: &str, err: JoinError) -> PipelineError {
    let message = if err.is_panic() {
        let payload = err.into_panic();
        payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panicked".to_string())
    } else {
        err.to_string()
    };
    PipelineError::TaskFailed {
        task: task.to_string(),
        message,
    }
}

fn build_report(
    outcome: PipelineOutcome,
    produced: &[ProducerReport],
    consumed: &AccumulatorReport,
    errors_dropped: u64,
    start: Instant,
) -> PipelineReport {
    PipelineReport {
        outcome,
        records_generated: produced.iter().map(|p| p.generated).sum(),
        records_pushed: produced.iter().map(|p| p.pushed).sum(),
        batches_loaded: consumed.batches_loaded,
        rows_loaded: consumed.rows_loaded,
        rows_discarded: consumed.rows_discarded,
        errors_dropped,
        elapsed: start.elapsed(),
    }
}
