//! Record contract shared by every generated record kind.

use std::fmt;

/// A single column value of a generated record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Signed integer column.
    Int(i64),
    /// Character column.
    Text(String),
    /// SQL NULL.
    Null,
}

impl FieldValue {
    /// Returns the integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Text(s) => write!(f, "{s:?}"),
            FieldValue::Null => f.write_str("NULL"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// An immutable generated row bound for one destination table.
///
/// `values()` must return exactly one value per entry of `COLUMNS`, in the
/// same order. The destination table is assumed to exist with matching
/// column order and types.
pub trait Record: Send + Sync + 'static {
    /// Destination table name.
    const TABLE: &'static str;

    /// Destination column names in field order.
    const COLUMNS: &'static [&'static str];

    /// Column values in `COLUMNS` order.
    fn values(&self) -> Vec<FieldValue>;
}
