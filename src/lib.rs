pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod routes;

use axum::http::StatusCode;
use axum::Router;
use config::ServerConfig;
use infra::{init_db, DbPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database: {0}")]
    Db(#[from] error::AppError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Router with request tracing and a per-request timeout (408 when exceeded).
pub fn build_router(pool: Arc<DbPool>, timeout: Duration) -> Router {
    routes::router()
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

/// Install the log subscriber. `RUST_LOG` wins over `default_level`; `log`
/// records from the use cases are bridged into it.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Already installed (e.g. by a test harness) is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    init_logging(&config.log_level);

    let db_path = config.db_path();
    log::info!("DB path: {:?}", db_path);
    let pool = init_db(&db_path).map_err(|e| {
        log::error!("DB init failed: {}", e);
        e
    })?;

    let app = build_router(Arc::new(pool), config.timeout());
    let listener = TcpListener::bind(config.bind).await?;
    log::info!("listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("received Ctrl+C, shutting down"),
        _ = terminate => log::info!("received SIGTERM, shutting down"),
    }
}
