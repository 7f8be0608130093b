//! faker
//!
//! Generates synthetic records concurrently and bulk loads them into MySQL,
//! one transaction per batch.
//!
//! # CLI Usage
//!
//! ```bash
//! # 10M panel order items, 10 workers, batches of 10k rows
//! faker generate
//!
//! # Smaller run with debug logging
//! MYSQL_HOST=db faker -d generate --num-records 1000 --batch-size 100 --num-workers 4
//!
//! # Exercise generation and batching without a database
//! faker generate --dry-run --seed 42
//! ```

pub mod cli;
pub mod generate;
pub mod logging;
pub mod signal;

pub use cli::{Cli, Commands};
pub use generate::{load, run_generate};
pub use logging::{init_logging, LoggingConfig};
pub use signal::{shutdown_signal, spawn_signal_handler, watch_signals, ShutdownSignals, SignalSource};
