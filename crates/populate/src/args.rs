//! CLI argument definitions for record generation.

use bulk_pipeline::{ConfigError, PipelineConfig};
use clap::Args;
use record_generator::RecordKind;

/// Arguments controlling what is generated and how it is batched.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Number of records to insert in a batch
    #[arg(long, default_value = "10000")]
    pub batch_size: usize,

    /// Number of workers to generate fake data
    #[arg(long, default_value = "10")]
    pub num_workers: usize,

    /// Number of records to generate (truncated to a multiple of --num-workers)
    #[arg(long, default_value = "10000000")]
    pub num_records: u64,

    /// Kind of record to generate
    #[arg(long, default_value = "panel-order-item")]
    pub kind: RecordKind,

    /// Random seed for reproducible generation (default: fresh entropy per run)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dry-run mode: generate and batch records without connecting to the database
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        PipelineConfig::new(self.batch_size, self.num_workers, self.num_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["faker"]).unwrap();
        assert_eq!(cli.args.batch_size, 10_000);
        assert_eq!(cli.args.num_workers, 10);
        assert_eq!(cli.args.num_records, 10_000_000);
        assert_eq!(cli.args.kind, RecordKind::PanelOrderItem);
        assert_eq!(cli.args.seed, None);
        assert!(!cli.args.dry_run);
    }

    #[test]
    fn test_pipeline_config_from_flags() {
        let cli = TestCli::try_parse_from([
            "faker",
            "--batch-size",
            "2",
            "--num-workers",
            "3",
            "--num-records",
            "10",
        ])
        .unwrap();
        let config = cli.args.pipeline_config().unwrap();
        assert_eq!(config.batch_size(), 2);
        assert_eq!(config.total_records(), 9);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = TestCli::try_parse_from(["faker", "--num-workers", "0"]).unwrap();
        assert_eq!(cli.args.pipeline_config().unwrap_err(), ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_oversized_batch_rejected_before_run() {
        let huge = usize::MAX.to_string();
        let cli = TestCli::try_parse_from(["faker", "--batch-size", huge.as_str()]).unwrap();
        assert_eq!(
            cli.args.pipeline_config().unwrap_err(),
            ConfigError::BatchSizeTooLarge(usize::MAX)
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(TestCli::try_parse_from(["faker", "--kind", "person"]).is_err());
    }
}
