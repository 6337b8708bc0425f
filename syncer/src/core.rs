use std::time::Duration;

use scikgdash_config::shared::{PgConnectionConfig, SyncerConfig, UpstreamConfig};
use scikgdash_etl::destination::Destination;
use scikgdash_etl::destination::postgres::PostgresDestination;
use scikgdash_etl::pipeline::Pipeline;
use scikgdash_etl::source::StatementSource;
use scikgdash_etl::source::client::OrkgClient;
use scikgdash_etl::types::SyncReport;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{debug, info};

/// Starts the sync job with the provided configuration.
///
/// Builds the upstream client and the Postgres destination, then runs the
/// pipeline once or on the configured interval. Any run failure propagates to
/// the caller; the operator re-runs the job and relies on upsert idempotence.
pub async fn start_syncer_with_config(config: SyncerConfig) -> anyhow::Result<()> {
    info!("starting statement syncer");

    log_config(&config);

    let source = OrkgClient::new(&config.upstream)?;
    let destination = PostgresDestination::new(&config.pg_connection);
    let pipeline = Pipeline::new(config.upstream.clone(), source, destination);

    match config.run_interval_secs {
        None => {
            let report = pipeline.run().await?;
            log_report(&report);
        }
        Some(interval_secs) => {
            run_periodically(pipeline, Duration::from_secs(interval_secs)).await?;
        }
    }

    info!("statement syncer completed");

    Ok(())
}

/// Runs the pipeline on a fixed interval until a shutdown signal arrives.
///
/// A failed run aborts the service rather than waiting for the next tick, so
/// the failure surfaces to the operator instead of hiding in the logs.
async fn run_periodically<S, D>(
    pipeline: Pipeline<S, D>,
    interval: Duration,
) -> anyhow::Result<()>
where
    S: StatementSource,
    D: Destination,
{
    loop {
        let report = pipeline.run().await?;
        log_report(&report);

        info!(secs = interval.as_secs(), "waiting until the next sync run");

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown_signal() => {
                info!("shutdown signal received, stopping periodic sync");
                return Ok(());
            }
        }
    }
}

/// Completes when SIGINT or SIGTERM is received.
///
/// SIGTERM is sent by orchestrators before SIGKILL during termination. A run
/// in flight is never interrupted; the signal only takes effect between runs.
async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("sigint (ctrl+c) received");
        }
        _ = sigterm.recv() => {
            info!("sigterm received");
        }
    }
}

fn log_config(config: &SyncerConfig) {
    log_pg_connection_config(&config.pg_connection);
    log_upstream_config(&config.upstream);

    debug!(run_interval_secs = config.run_interval_secs, "syncer schedule config");
}

fn log_pg_connection_config(config: &PgConnectionConfig) {
    debug!(
        host = config.host,
        port = config.port,
        dbname = config.name,
        username = config.username,
        "destination postgres connection config",
    );
}

fn log_upstream_config(config: &UpstreamConfig) {
    debug!(
        base_url = config.base_url,
        page_size = config.page_size,
        title_filter = config.title_filter.as_deref(),
        request_timeout_secs = config.request_timeout_secs,
        max_pages = config.max_pages,
        "upstream endpoint config"
    );
}

fn log_report(report: &SyncReport) {
    info!(
        load_id = %report.load_id,
        pages_fetched = report.pages_fetched,
        batches_applied = report.batches_applied,
        rows_loaded = report.rows_loaded,
        resources = ?report.resources,
        "sync run summary"
    );
}
