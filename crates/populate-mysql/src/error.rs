//! Error types for the MySQL backend.

use thiserror::Error;

/// Errors that can occur while talking to MySQL.
#[derive(Error, Debug)]
pub enum MySQLPopulatorError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    MySQL(#[from] mysql_async::Error),

    /// The server could not be reached at startup.
    #[error("Failed to connect to MySQL at {addr}: {source}")]
    Connection {
        addr: String,
        source: mysql_async::Error,
    },

    /// A batch needs more placeholders than one prepared statement allows.
    #[error("INSERT into '{table}' needs {count} placeholders, MySQL allows at most {max}")]
    TooManyPlaceholders {
        table: &'static str,
        count: usize,
        max: usize,
    },
}
