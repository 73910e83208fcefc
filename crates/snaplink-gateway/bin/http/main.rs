mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use snaplink_core::{MetricsSink, Repository, ScanRepository, SystemClock};
use snaplink_gateway::{App, AppState};
use snaplink_redirector::{RedirectorService, RedirectorSettings};
use snaplink_reporter::ReporterService;
use snaplink_shortener::ShortenerService;
use snaplink_storage::{InMemoryRepository, RedisRepository, TimeoutRepository};
use snaplink_telemetry::{OtelMetricsSink, TelemetryConfig, TracingMetricsSink};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let telemetry = snaplink_telemetry::init(
        &TelemetryConfig::builder()
            .log_format(config.log_format.into())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        table = %config.table,
        "starting snaplink gateway"
    );

    let metrics: Arc<dyn MetricsSink> = if telemetry.otlp_enabled() {
        Arc::new(OtelMetricsSink::new())
    } else {
        Arc::new(TracingMetricsSink)
    };

    match config.storage {
        StorageBackendArg::InMemory => {
            let repository = InMemoryRepository::new();
            let interval = config.purge_interval();
            let _purger = repository.spawn_purger(SystemClock, interval);
            run_server(&config, repository, metrics).await?;
        }
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("redis url is required when storage backend is redis")?;
            let repository = RedisRepository::connect(redis_url, config.table.clone())
                .await
                .context("failed to connect to redis")?;
            run_server(&config, repository, metrics).await?;
        }
    }

    Ok(())
}

async fn run_server<R>(
    config: &CLI,
    repository: R,
    metrics: Arc<dyn MetricsSink>,
) -> anyhow::Result<()>
where
    R: Repository + ScanRepository,
{
    let repository = Arc::new(TimeoutRepository::new(repository, config.store_timeout()));

    let shortener = ShortenerService::new(Arc::clone(&repository), config.base_url.clone());
    let redirector = RedirectorService::new(
        Arc::clone(&repository),
        Arc::clone(&metrics),
        RedirectorSettings::builder()
            .metrics_timeout(config.metrics_timeout())
            .build(),
    );
    let reporter = ReporterService::new(repository, metrics)
        .with_metrics_timeout(config.metrics_timeout());

    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        Arc::new(reporter),
    );

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "gateway listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
