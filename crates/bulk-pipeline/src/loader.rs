//! Transactional bulk loading of batches.

use crate::batch::Batch;
use crate::error::{InsertError, StoreError};
use crate::store::{InsertOutcome, InsertStatement, StoreTransaction, TransactionalStore};
use async_trait::async_trait;
use record_generator::Record;
use tracing::{debug, error, warn};

/// Loads one batch atomically: every row becomes visible, or none does.
#[async_trait]
pub trait BulkLoader<R: Record>: Send + Sync + 'static {
    async fn insert(&self, batch: &Batch<R>) -> Result<InsertOutcome, InsertError>;
}

/// Owns an open transaction and guarantees it is terminated.
///
/// `commit` and `rollback` consume the guard. If the guard is dropped while
/// still holding the transaction (early return, panic, cancelled future) a
/// rollback is spawned on the current Tokio runtime.
pub struct TransactionGuard<T: StoreTransaction> {
    tx: Option<T>,
}

impl<T: StoreTransaction> TransactionGuard<T> {
    pub fn new(tx: T) -> Self {
        Self { tx: Some(tx) }
    }

    pub async fn execute(&mut self, statement: &InsertStatement) -> Result<InsertOutcome, StoreError> {
        match self.tx.as_mut() {
            Some(tx) => tx.execute(statement).await,
            None => Err(StoreError::message("transaction already finished")),
        }
    }

    /// Commit; if that fails, roll back before reporting the commit error.
    pub async fn commit(mut self) -> Result<(), InsertError> {
        let Some(mut tx) = self.tx.take() else {
            return Ok(());
        };
        match tx.commit().await {
            Ok(()) => Ok(()),
            Err(source) => {
                error!(error = %source, "Commit failed, rolling back");
                let rollback = rollback_logged(&mut tx).await;
                Err(InsertError::Commit { source, rollback })
            }
        }
    }

    /// Roll back, returning the rollback failure if there was one.
    pub async fn rollback(mut self) -> Option<StoreError> {
        match self.tx.take() {
            Some(mut tx) => rollback_logged(&mut tx).await,
            None => None,
        }
    }
}

async fn rollback_logged<T: StoreTransaction>(tx: &mut T) -> Option<StoreError> {
    match tx.rollback().await {
        Ok(()) => None,
        Err(e) => {
            error!(error = %e, "Rollback failed");
            Some(e)
        }
    }
}

impl<T: StoreTransaction> Drop for TransactionGuard<T> {
    fn drop(&mut self) {
        let Some(mut tx) = self.tx.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Transaction dropped before commit, rolling back");
                handle.spawn(async move {
                    rollback_logged(&mut tx).await;
                });
            }
            Err(_) => {
                error!("Transaction dropped outside a runtime; rollback left to the store driver");
            }
        }
    }
}

/// [`BulkLoader`] running one multi-row INSERT per batch inside a transaction.
pub struct TransactionalLoader<S> {
    store: S,
}

impl<S: TransactionalStore> TransactionalLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<R: Record, S: TransactionalStore> BulkLoader<R> for TransactionalLoader<S> {
    async fn insert(&self, batch: &Batch<R>) -> Result<InsertOutcome, InsertError> {
        let tx = self.store.begin().await.map_err(InsertError::Begin)?;
        let mut guard = TransactionGuard::new(tx);

        let statement = match InsertStatement::for_batch(batch) {
            Ok(statement) => statement,
            Err(reason) => {
                let rollback = guard.rollback().await;
                return Err(InsertError::Statement { reason, rollback });
            }
        };

        let outcome = match guard.execute(&statement).await {
            Ok(outcome) => outcome,
            Err(source) => {
                error!(table = R::TABLE, rows = batch.len(), error = %source, "Insert failed, rolling back");
                let rollback = guard.rollback().await;
                return Err(InsertError::Execute { source, rollback });
            }
        };

        guard.commit().await?;

        debug!(
            table = R::TABLE,
            rows_affected = outcome.rows_affected,
            last_insert_id = ?outcome.last_insert_id,
            "Batch committed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use record_generator::FieldValue;
    use std::time::Duration;

    #[derive(Debug, Clone)]
    struct Item(i64);

    impl Record for Item {
        const TABLE: &'static str = "items";
        const COLUMNS: &'static [&'static str] = &["value"];

        fn values(&self) -> Vec<FieldValue> {
            vec![FieldValue::Int(self.0)]
        }
    }

    struct Broken;

    impl Record for Broken {
        const TABLE: &'static str = "broken";
        const COLUMNS: &'static [&'static str] = &["a", "b"];

        fn values(&self) -> Vec<FieldValue> {
            vec![]
        }
    }

    struct Exploding;

    impl Record for Exploding {
        const TABLE: &'static str = "exploding";
        const COLUMNS: &'static [&'static str] = &["a"];

        fn values(&self) -> Vec<FieldValue> {
            panic!("value synthesis blew up")
        }
    }

    fn batch(values: &[i64]) -> Batch<Item> {
        Batch::from(values.iter().map(|v| Item(*v)).collect::<Vec<_>>())
    }

    async fn wait_until_closed(store: &MemoryStore) {
        for _ in 0..100 {
            if store.stats().open == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("transaction left open: {:?}", store.stats());
    }

    #[tokio::test]
    async fn test_successful_insert_commits() {
        let loader = TransactionalLoader::new(MemoryStore::new());

        let outcome = loader.insert(&batch(&[1, 2])).await.unwrap();

        assert_eq!(outcome.rows_affected, 2);
        assert_eq!(outcome.last_insert_id, Some(1));
        let store = loader.store();
        assert_eq!(
            store.rows("items"),
            vec![vec![FieldValue::Int(1)], vec![FieldValue::Int(2)]]
        );
        assert_eq!(store.stats().committed, 1);
        assert_eq!(store.stats().open, 0);
    }

    #[tokio::test]
    async fn test_failed_execute_rolls_back_whole_batch() {
        let loader = TransactionalLoader::new(MemoryStore::new().fail_execute_on(1));

        let err = loader.insert(&batch(&[1, 2, 3])).await.unwrap_err();

        assert!(matches!(err, InsertError::Execute { rollback: None, .. }));
        let store = loader.store();
        assert_eq!(store.row_count("items"), 0);
        assert_eq!(store.stats().rolled_back, 1);
        assert_eq!(store.stats().open, 0);
    }

    #[tokio::test]
    async fn test_failed_commit_attempts_rollback() {
        let loader = TransactionalLoader::new(MemoryStore::new().fail_commit_on(1));

        let err = loader.insert(&batch(&[1])).await.unwrap_err();

        assert!(matches!(err, InsertError::Commit { rollback: None, .. }));
        let store = loader.store();
        assert_eq!(store.row_count("items"), 0);
        assert_eq!(store.stats().rolled_back, 1);
        assert_eq!(store.stats().open, 0);
    }

    #[tokio::test]
    async fn test_rollback_failure_reported_alongside_original() {
        let loader =
            TransactionalLoader::new(MemoryStore::new().fail_execute_on(1).fail_rollback());

        let err = loader.insert(&batch(&[1])).await.unwrap_err();

        match &err {
            InsertError::Execute { source, rollback } => {
                assert!(source.to_string().contains("injected failure on statement 1"));
                assert!(rollback.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(loader.store().row_count("items"), 0);
    }

    #[tokio::test]
    async fn test_statement_failure_rolls_back() {
        let loader = TransactionalLoader::new(MemoryStore::new());

        let err = loader.insert(&Batch::from(vec![Broken])).await.unwrap_err();

        assert!(matches!(err, InsertError::Statement { .. }));
        assert_eq!(loader.store().stats().rolled_back, 1);
        assert_eq!(loader.store().stats().open, 0);
    }

    #[tokio::test]
    async fn test_panic_during_insert_still_rolls_back() {
        let store = MemoryStore::new();
        let loader = TransactionalLoader::new(store.clone());

        let result =
            tokio::spawn(async move { loader.insert(&Batch::from(vec![Exploding])).await }).await;

        assert!(result.unwrap_err().is_panic());
        wait_until_closed(&store).await;
        assert_eq!(store.stats().rolled_back, 1);
        assert_eq!(store.stats().committed, 0);
    }

    #[tokio::test]
    async fn test_dropped_guard_rolls_back() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let stmt = InsertStatement::for_batch(&batch(&[9])).unwrap();
        tx.execute(&stmt).await.unwrap();

        drop(TransactionGuard::new(tx));

        wait_until_closed(&store).await;
        assert_eq!(store.row_count("items"), 0);
        assert_eq!(store.stats().rolled_back, 1);
    }
}
