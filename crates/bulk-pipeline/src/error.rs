//! Error types for the load pipeline.

use record_generator::GenerationError;
use std::error::Error as StdError;
use thiserror::Error;

/// Error raised by a store backend (driver, connection or query failure).
#[derive(Error, Debug)]
#[error("{inner}")]
pub struct StoreError {
    inner: Box<dyn StdError + Send + Sync + 'static>,
}

impl StoreError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Self { inner: err.into() }
    }

    /// Store error carrying only a message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::new(msg.into())
    }
}

fn rollback_note(rollback: &Option<StoreError>) -> String {
    match rollback {
        Some(e) => format!(" (rollback also failed: {e})"),
        None => String::new(),
    }
}

/// Failure to load one batch. The batch's transaction has been terminated.
#[derive(Error, Debug)]
pub enum InsertError {
    /// The transaction could not be started; nothing was written.
    #[error("Failed to begin transaction: {0}")]
    Begin(StoreError),

    /// The INSERT could not be built from the batch.
    #[error("Failed to build insert statement: {reason}{}", rollback_note(.rollback))]
    Statement {
        reason: String,
        rollback: Option<StoreError>,
    },

    /// The INSERT failed; the transaction was rolled back.
    #[error("Insert execution failed: {source}{}", rollback_note(.rollback))]
    Execute {
        source: StoreError,
        rollback: Option<StoreError>,
    },

    /// COMMIT failed; a rollback was attempted.
    #[error("Commit failed: {source}{}", rollback_note(.rollback))]
    Commit {
        source: StoreError,
        rollback: Option<StoreError>,
    },
}

impl InsertError {
    /// The rollback failure logged alongside this error, if any.
    pub fn rollback_error(&self) -> Option<&StoreError> {
        match self {
            InsertError::Begin(_) => None,
            InsertError::Statement { rollback, .. }
            | InsertError::Execute { rollback, .. }
            | InsertError::Commit { rollback, .. } => rollback.as_ref(),
        }
    }
}

/// Pipeline-fatal error. The first one reported aborts the whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A producer's record factory failed.
    #[error("Record generation failed in worker {worker}: {source}")]
    Generation {
        worker: usize,
        source: GenerationError,
    },

    /// A batch could not be loaded.
    #[error("Bulk insert failed: {0}")]
    Insert(#[from] InsertError),

    /// A producer or consumer task panicked or was aborted.
    #[error("{task} task failed: {message}")]
    TaskFailed { task: String, message: String },

    /// The run was stopped by an external cancellation request.
    #[error("Pipeline cancelled before completion")]
    Cancelled,
}
