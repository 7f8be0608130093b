//! Command-line interface for faker
//!
//! ```bash
//! faker generate \
//!   --batch-size 10000 \
//!   --num-workers 10 \
//!   --num-records 10000000 \
//!   --mysql-host localhost --mysql-database mydatabase
//! ```
//!
//! Connection settings default to the `MYSQL_DATABASE`, `MYSQL_USER`,
//! `MYSQL_PASSWORD`, `MYSQL_HOST` and `MYSQL_PORT` environment variables.

use clap::Parser;
use faker::{init_logging, run_generate, Cli, Commands, LoggingConfig};
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::new(env!("CARGO_PKG_NAME"), cli.debug);
    let root = init_logging(&logging)?;

    async move {
        tracing::info!("Start generating fake data");

        match cli.command {
            Commands::Generate { args, mysql } => {
                if let Err(e) = run_generate(args, mysql).await {
                    tracing::error!("{e:#}");
                    return Err(e);
                }
            }
        }

        Ok(())
    }
    .instrument(root)
    .await
}
