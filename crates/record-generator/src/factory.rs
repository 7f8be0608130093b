//! Record factory contract.

use crate::record::Record;

/// Error type for record generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// A field's generation rule has an empty range.
    #[error("Invalid range for field '{field}': [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    /// The factory cannot produce any more records.
    #[error("Factory exhausted: {0}")]
    Exhausted(String),
}

/// Produces one synthetic record per call.
///
/// Each producer worker owns its own factory, so implementations keep their
/// random state in `self` rather than in any global generator. Successive
/// calls are independent of each other.
pub trait RecordFactory: Send + 'static {
    /// The record kind this factory produces.
    type Record: Record;

    /// Generate the next record.
    fn create(&mut self) -> Result<Self::Record, GenerationError>;
}
