//! In-memory transactional store.
//!
//! Rows staged by a transaction become visible only on commit. Used by the
//! CLI's dry-run mode (in discarding form) and by tests, which can inject
//! failures at specific statements.

use crate::error::StoreError;
use crate::store::{InsertOutcome, InsertStatement, StoreTransaction, TransactionalStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use record_generator::FieldValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Transaction counters of a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    pub begun: u64,
    pub committed: u64,
    pub rolled_back: u64,
    pub rollback_failures: u64,
    /// Transactions neither committed nor rolled back yet.
    pub open: u64,
}

#[derive(Default)]
struct MemoryState {
    retain_rows: bool,
    tables: HashMap<&'static str, Vec<Vec<FieldValue>>>,
    row_counts: HashMap<&'static str, u64>,
    stats: MemoryStoreStats,
    executes: u64,
    commits: u64,
    next_id: u64,
    fail_execute_on: Option<u64>,
    fail_commit_on: Option<u64>,
    fail_rollback: bool,
}

/// Shared in-memory store; clones see the same tables.
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Store that keeps every committed row.
    pub fn new() -> Self {
        Self::with_retention(true)
    }

    /// Store that only counts committed rows.
    pub fn discarding() -> Self {
        Self::with_retention(false)
    }

    fn with_retention(retain_rows: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                retain_rows,
                ..Default::default()
            })),
        }
    }

    /// Fail the `n`th statement executed against this store (1-based).
    pub fn fail_execute_on(self, n: u64) -> Self {
        self.state.lock().fail_execute_on = Some(n);
        self
    }

    /// Fail the `n`th commit attempted against this store (1-based).
    pub fn fail_commit_on(self, n: u64) -> Self {
        self.state.lock().fail_commit_on = Some(n);
        self
    }

    /// Make every rollback fail.
    pub fn fail_rollback(self) -> Self {
        self.state.lock().fail_rollback = true;
        self
    }

    /// Committed rows of `table`, in commit order. Empty for discarding stores.
    pub fn rows(&self, table: &str) -> Vec<Vec<FieldValue>> {
        self.state
            .lock()
            .tables
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of committed rows of `table`.
    pub fn row_count(&self, table: &str) -> u64 {
        self.state
            .lock()
            .row_counts
            .get(table)
            .copied()
            .unwrap_or(0)
    }

    pub fn stats(&self) -> MemoryStoreStats {
        self.state.lock().stats
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionalStore for MemoryStore {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, StoreError> {
        let mut state = self.state.lock();
        state.stats.begun += 1;
        state.stats.open += 1;
        Ok(MemoryTransaction {
            state: self.state.clone(),
            staged: Vec::new(),
            finished: false,
        })
    }
}

/// Transaction over a [`MemoryStore`].
pub struct MemoryTransaction {
    state: Arc<Mutex<MemoryState>>,
    staged: Vec<(&'static str, Vec<Vec<FieldValue>>)>,
    finished: bool,
}

impl MemoryTransaction {
    fn finish(&mut self, state: &mut MemoryState) {
        self.finished = true;
        self.staged.clear();
        state.stats.open -= 1;
    }
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn execute(&mut self, statement: &InsertStatement) -> Result<InsertOutcome, StoreError> {
        if self.finished {
            return Err(StoreError::message("transaction already finished"));
        }
        let mut state = self.state.lock();
        state.executes += 1;
        if state.fail_execute_on == Some(state.executes) {
            return Err(StoreError::message(format!(
                "injected failure on statement {}",
                state.executes
            )));
        }

        let rows: Vec<Vec<FieldValue>> = statement.rows().map(<[FieldValue]>::to_vec).collect();
        let first_id = state.next_id + 1;
        state.next_id += rows.len() as u64;
        self.staged.push((statement.table, rows));

        Ok(InsertOutcome {
            rows_affected: statement.row_count as u64,
            last_insert_id: Some(first_id),
        })
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        if self.finished {
            return Err(StoreError::message("transaction already finished"));
        }
        let state_handle = self.state.clone();
        let mut state = state_handle.lock();
        state.commits += 1;
        if state.fail_commit_on == Some(state.commits) {
            return Err(StoreError::message(format!(
                "injected failure on commit {}",
                state.commits
            )));
        }

        for (table, rows) in self.staged.drain(..) {
            *state.row_counts.entry(table).or_insert(0) += rows.len() as u64;
            if state.retain_rows {
                state.tables.entry(table).or_default().extend(rows);
            }
        }
        state.stats.committed += 1;
        self.finish(&mut state);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        if self.finished {
            return Ok(());
        }
        let state_handle = self.state.clone();
        let mut state = state_handle.lock();
        if state.fail_rollback {
            state.stats.rollback_failures += 1;
            self.finish(&mut state);
            return Err(StoreError::message("injected rollback failure"));
        }
        state.stats.rolled_back += 1;
        self.finish(&mut state);
        Ok(())
    }
}
