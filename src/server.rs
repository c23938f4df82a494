//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, access log worker spawning, and the
//! Axum server lifecycle including graceful shutdown.

use crate::config::{Config, StorageBackend};
use crate::domain::access_log_sink::AccessLogSink;
use crate::domain::access_log_worker::run_access_log_worker;
use crate::domain::repositories::{AccessLogRepository, ShortUrlRepository};
use crate::infrastructure::persistence::{
    MemoryStore, PgAccessLogRepository, PgShortUrlRepository,
};
use crate::routes::{app_router, with_trailing_slash_normalization};
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

/// Upper bound on waiting for queued access logs after the server stops.
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The record store (PostgreSQL with migrations, or in-memory)
/// - The access log queue and its background worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, finishes
/// in-flight requests and then waits for the worker to drain the queue.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (short_url_repository, access_log_repository) = build_stores(&config).await?;

    let (access_log_sink, access_log_rx) =
        AccessLogSink::channel(config.access_log_queue_capacity);

    let worker = tokio::spawn(run_access_log_worker(
        access_log_rx,
        access_log_repository.clone(),
        config.access_log_worker_concurrency,
    ));
    info!(
        concurrency = config.access_log_worker_concurrency,
        "Access log worker started"
    );

    let state = AppState::new(
        short_url_repository,
        access_log_repository,
        access_log_sink,
        &config.base_url,
        config.default_ttl(),
        config.behind_proxy,
    );

    let app = with_trailing_slash_normalization(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router and every sink clone are gone now, so the worker sees the
    // channel close once it has consumed what is queued.
    match tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => info!("Access log queue drained"),
        Ok(Err(e)) => error!(error = %e, "Access log worker panicked"),
        Err(_) => warn!("Timed out waiting for access log queue to drain"),
    }

    Ok(())
}

type Stores = (Arc<dyn ShortUrlRepository>, Arc<dyn AccessLogRepository>);

async fn build_stores(config: &Config) -> Result<Stores> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;

            let pool = connect_pool(config, database_url).await?;
            info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            info!("Migrations applied");

            let pool = Arc::new(pool);
            let short_urls: Arc<dyn ShortUrlRepository> =
                Arc::new(PgShortUrlRepository::new(pool.clone()));
            let access_logs: Arc<dyn AccessLogRepository> =
                Arc::new(PgAccessLogRepository::new(pool));
            Ok((short_urls, access_logs))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let short_urls: Arc<dyn ShortUrlRepository> = store.clone();
            let access_logs: Arc<dyn AccessLogRepository> = store;
            Ok((short_urls, access_logs))
        }
    }
}

async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
