//! Field generation rules.
//!
//! Each rule describes the set of values a field may take and draws values
//! from a caller-supplied RNG.

pub mod numeric;
