//! Pooled MySQL store with one transaction per batch.

use crate::args::MySQLConnectionArgs;
use crate::error::MySQLPopulatorError;
use crate::insert::render_insert;
use async_trait::async_trait;
use bulk_pipeline::{InsertOutcome, InsertStatement, StoreError, StoreTransaction, TransactionalStore};
use mysql_async::prelude::*;
use mysql_async::{Params, Pool, Transaction, TxOpts};
use tracing::{debug, info};

/// MySQL connection pool acting as a [`TransactionalStore`].
#[derive(Clone)]
pub struct MySQLStore {
    pool: Pool,
}

impl MySQLStore {
    /// Build the pool and verify the server is reachable.
    pub async fn connect(args: &MySQLConnectionArgs) -> Result<Self, MySQLPopulatorError> {
        info!("Connecting to MySQL at {}", args.masked_url());

        let pool = Pool::new(args.opts());
        let store = Self { pool };

        let mut conn = store
            .pool
            .get_conn()
            .await
            .map_err(|source| MySQLPopulatorError::Connection {
                addr: args.addr(),
                source,
            })?;
        conn.ping()
            .await
            .map_err(|source| MySQLPopulatorError::Connection {
                addr: args.addr(),
                source,
            })?;
        drop(conn);

        debug!("MySQL connection verified");
        Ok(store)
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Close every pooled connection.
    pub async fn disconnect(self) -> Result<(), MySQLPopulatorError> {
        self.pool.disconnect().await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionalStore for MySQLStore {
    type Transaction = MySQLTransaction;

    async fn begin(&self) -> Result<MySQLTransaction, StoreError> {
        let tx = self
            .pool
            .start_transaction(TxOpts::default())
            .await
            .map_err(StoreError::new)?;
        Ok(MySQLTransaction { inner: Some(tx) })
    }
}

/// An open MySQL transaction holding a pooled connection.
///
/// `inner` is taken on commit or rollback; dropping an unfinished
/// transaction makes the driver roll it back before the connection
/// returns to the pool.
pub struct MySQLTransaction {
    inner: Option<Transaction<'static>>,
}

impl MySQLTransaction {
    fn open(&mut self) -> Result<&mut Transaction<'static>, StoreError> {
        self.inner
            .as_mut()
            .ok_or_else(|| StoreError::message("transaction already finished"))
    }
}

#[async_trait]
impl StoreTransaction for MySQLTransaction {
    async fn execute(&mut self, statement: &InsertStatement) -> Result<InsertOutcome, StoreError> {
        let (sql, params) = render_insert(statement).map_err(StoreError::new)?;
        let tx = self.open()?;

        tx.exec_drop(&sql, Params::Positional(params))
            .await
            .map_err(StoreError::new)?;

        Ok(InsertOutcome {
            rows_affected: tx.affected_rows(),
            last_insert_id: tx.last_insert_id(),
        })
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        match self.inner.take() {
            Some(tx) => tx.commit().await.map_err(StoreError::new),
            None => Err(StoreError::message("transaction already finished")),
        }
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        match self.inner.take() {
            Some(tx) => tx.rollback().await.map_err(StoreError::new),
            None => Ok(()),
        }
    }
}
