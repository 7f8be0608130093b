//! MySQL backend for the faker bulk loader.
//!
//! Provides the environment-derived connection settings, the connection
//! pool, and a [`TransactionalStore`](bulk_pipeline::TransactionalStore)
//! that inserts each batch as one multi-row `INSERT` inside a MySQL
//! transaction.

pub mod args;
pub mod error;
pub mod insert;
pub mod store;

pub use args::MySQLConnectionArgs;
pub use error::MySQLPopulatorError;
pub use insert::{check_batch_size, render_insert, MAX_PLACEHOLDERS};
pub use store::{MySQLStore, MySQLTransaction};
