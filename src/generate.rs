//! The `generate` command.

use crate::signal::spawn_signal_handler;
use anyhow::Context;
use bulk_pipeline::{
    MemoryStore, Pipeline, PipelineConfig, PipelineReport, PipelineSummary, TransactionalLoader,
    TransactionalStore,
};
use populate::GenerateArgs;
use populate_mysql::{check_batch_size, MySQLConnectionArgs, MySQLStore};
use record_generator::{PanelOrderItemFactory, RecordKind};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Generate records and bulk load them, stopping on SIGINT/SIGTERM.
pub async fn run_generate(
    args: GenerateArgs,
    mysql: MySQLConnectionArgs,
) -> anyhow::Result<PipelineSummary> {
    let config = args
        .pipeline_config()
        .context("Invalid pipeline configuration")?;
    debug!(
        batch_size = config.batch_size(),
        num_workers = config.num_workers(),
        num_records = config.num_records(),
        "Initialize pipeline configuration"
    );

    let shutdown = CancellationToken::new();

    let report = if args.dry_run {
        info!("Dry-run: records are generated and batched but not stored");
        let store = MemoryStore::discarding();
        let handler = spawn_signal_handler(shutdown.clone());
        let report = load(args.kind, config, args.seed, store, shutdown.child_token()).await;
        stop_signal_handler(shutdown, handler).await;
        report
    } else {
        check_batch_size(args.kind.table(), args.kind.columns().len(), config.batch_size())
            .context("Invalid pipeline configuration")?;
        let store = MySQLStore::connect(&mysql)
            .await
            .context("Error opening database")?;
        let handler = spawn_signal_handler(shutdown.clone());
        let report = load(
            args.kind,
            config,
            args.seed,
            store.clone(),
            shutdown.child_token(),
        )
        .await;
        stop_signal_handler(shutdown, handler).await;
        if let Err(e) = store.disconnect().await {
            warn!("Failed to close MySQL pool: {e}");
        }
        report
    };

    info!(
        table = args.kind.table(),
        rows = report.rows_loaded,
        batches = report.batches_loaded,
        elapsed = ?report.elapsed,
        rows_per_second = report.rows_per_second(),
        "Finish generating fake data"
    );

    report
        .into_result()
        .with_context(|| format!("Failed to generate {} records", args.kind))
}

/// Run one pipeline for `kind` against `store`.
pub async fn load<S: TransactionalStore>(
    kind: RecordKind,
    config: PipelineConfig,
    seed: Option<u64>,
    store: S,
    cancel: CancellationToken,
) -> PipelineReport {
    let mut pipeline = Pipeline::new(config);
    let loader = TransactionalLoader::new(store);

    match kind {
        RecordKind::PanelOrderItem => {
            pipeline
                .run(
                    |worker| PanelOrderItemFactory::for_worker(seed, worker),
                    loader,
                    cancel,
                )
                .await
        }
    }
}

async fn stop_signal_handler(shutdown: CancellationToken, handler: tokio::task::JoinHandle<()>) {
    shutdown.cancel();
    // after a first signal the handler waits for a second one
    handler.abort();
    match handler.await {
        Err(e) if !e.is_cancelled() => warn!("Signal handler task failed: {e}"),
        _ => {}
    }
}
