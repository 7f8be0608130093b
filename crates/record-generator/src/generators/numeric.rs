//! Numeric value generators.

use crate::factory::GenerationError;
use rand::Rng;

/// Inclusive integer range a field is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Check that the range is non-empty.
    pub fn validate(&self, field: &'static str) -> Result<(), GenerationError> {
        if self.min > self.max {
            return Err(GenerationError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Generate a random integer in the range (inclusive).
    ///
    /// Callers must `validate` first; `gen_range` panics on an empty range.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
