//! First-error capture for the whole pipeline.

use crate::error::PipelineError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// Single-slot error channel shared by producers and the consumer.
///
/// The first reported error is kept and cancels the pipeline. Anything
/// reported afterwards is logged and dropped, so callers cannot rely on
/// every error being observable.
#[derive(Clone)]
pub struct ErrorAggregator {
    tx: mpsc::Sender<PipelineError>,
    cancel: CancellationToken,
    dropped: Arc<AtomicU64>,
}

/// Receiving half of an [`ErrorAggregator`].
pub struct FirstError {
    rx: mpsc::Receiver<PipelineError>,
    dropped: Arc<AtomicU64>,
}

impl ErrorAggregator {
    pub fn new(cancel: CancellationToken) -> (Self, FirstError) {
        let (tx, rx) = mpsc::channel(1);
        let dropped = Arc::new(AtomicU64::new(0));
        (
            Self {
                tx,
                cancel,
                dropped: dropped.clone(),
            },
            FirstError { rx, dropped },
        )
    }

    /// Report a pipeline-fatal error. Returns `true` if it was the first.
    pub fn report(&self, err: PipelineError) -> bool {
        match self.tx.try_send(err) {
            Ok(()) => {
                self.cancel.cancel();
                true
            }
            Err(TrySendError::Full(err)) | Err(TrySendError::Closed(err)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(error = %err, dropped = true, "Error after the first failure; not propagated");
                false
            }
        }
    }
}

impl FirstError {
    /// Take the captured error, if any. Call after every reporter finished.
    pub fn take(&mut self) -> Option<PipelineError> {
        let first = self.rx.try_recv().ok();
        if let Some(err) = &first {
            error!(error = %err, "Pipeline aborted");
        }
        first
    }

    /// Number of errors dropped because one was already captured.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
