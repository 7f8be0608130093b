//! Transactional store abstraction.
//!
//! The loader is written against these traits so the same transaction
//! discipline drives MySQL and the in-memory store.

use crate::batch::Batch;
use crate::error::StoreError;
use async_trait::async_trait;
use record_generator::{FieldValue, Record};

/// Result of one executed INSERT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub rows_affected: u64,
    /// Auto-increment identifier of the first inserted row, when the store reports one.
    pub last_insert_id: Option<u64>,
}

/// One parameterized multi-row INSERT.
///
/// `params` holds `row_count * columns.len()` values, row by row, each row
/// in record field order.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub row_count: usize,
    pub params: Vec<FieldValue>,
}

impl InsertStatement {
    /// Build the statement covering every record of `batch`.
    pub fn for_batch<R: Record>(batch: &Batch<R>) -> Result<Self, String> {
        if batch.is_empty() {
            return Err(format!("empty batch for table '{}'", R::TABLE));
        }

        let width = R::COLUMNS.len();
        let mut params = Vec::with_capacity(batch.len() * width);
        for (i, record) in batch.records().iter().enumerate() {
            let values = record.values();
            if values.len() != width {
                return Err(format!(
                    "record {i} of table '{}' has {} values for {width} columns",
                    R::TABLE,
                    values.len()
                ));
            }
            params.extend(values);
        }

        Ok(Self {
            table: R::TABLE,
            columns: R::COLUMNS,
            row_count: batch.len(),
            params,
        })
    }

    /// Parameters grouped per row.
    pub fn rows(&self) -> impl Iterator<Item = &[FieldValue]> {
        self.params.chunks(self.columns.len())
    }
}

/// A store that can open transactions.
#[async_trait]
pub trait TransactionalStore: Send + Sync + 'static {
    type Transaction: StoreTransaction;

    async fn begin(&self) -> Result<Self::Transaction, StoreError>;
}

/// An open transaction.
///
/// After `commit` or `rollback` returns (successfully or not) the
/// transaction is finished; a later `rollback` must be a no-op.
#[async_trait]
pub trait StoreTransaction: Send + 'static {
    async fn execute(&mut self, statement: &InsertStatement) -> Result<InsertOutcome, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pair(i64, i64);

    impl Record for Pair {
        const TABLE: &'static str = "pairs";
        const COLUMNS: &'static [&'static str] = &["a", "b"];

        fn values(&self) -> Vec<FieldValue> {
            vec![FieldValue::Int(self.0), FieldValue::Int(self.1)]
        }
    }

    struct Lopsided;

    impl Record for Lopsided {
        const TABLE: &'static str = "lopsided";
        const COLUMNS: &'static [&'static str] = &["a", "b"];

        fn values(&self) -> Vec<FieldValue> {
            vec![FieldValue::Int(1)]
        }
    }

    #[test]
    fn test_params_in_record_field_order() {
        let batch = Batch::from(vec![Pair(1, 2), Pair(3, 4)]);
        let stmt = InsertStatement::for_batch(&batch).unwrap();

        assert_eq!(stmt.table, "pairs");
        assert_eq!(stmt.row_count, 2);
        assert_eq!(
            stmt.params,
            vec![
                FieldValue::Int(1),
                FieldValue::Int(2),
                FieldValue::Int(3),
                FieldValue::Int(4)
            ]
        );
        let rows: Vec<_> = stmt.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[FieldValue::Int(3), FieldValue::Int(4)]);
    }

    #[test]
    fn test_rejects_arity_mismatch() {
        let batch = Batch::from(vec![Lopsided]);
        let err = InsertStatement::for_batch(&batch).unwrap_err();
        assert!(err.contains("has 1 values for 2 columns"));
    }

    #[test]
    fn test_rejects_empty_batch() {
        let batch: Batch<Pair> = Batch::with_capacity(4);
        assert!(InsertStatement::for_batch(&batch).is_err());
    }
}
