//! Command-line definitions.

use clap::{Parser, Subcommand};
use populate::GenerateArgs;
use populate_mysql::MySQLConnectionArgs;

#[derive(Parser, Debug)]
#[command(name = "faker")]
#[command(about = "A command-line tool to generate fake data and insert into database")]
#[command(version, long_about = None)]
pub struct Cli {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate fake data
    Generate {
        #[command(flatten)]
        args: GenerateArgs,

        /// MySQL connection options
        #[command(flatten)]
        mysql: MySQLConnectionArgs,
    },
}
