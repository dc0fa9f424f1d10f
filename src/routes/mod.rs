//! HTTP handlers (DTO boundary).

pub mod club;
pub mod extract;
pub mod fan;
pub mod health;
pub mod subscription;

use crate::error::AppError;
use crate::infra::DbPool;
use axum::Router;
use std::sync::Arc;

pub type AppState = Arc<DbPool>;

/// All routes, without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(fan::router())
        .merge(club::router())
        .merge(subscription::router())
}

/// Run a use case on the blocking pool. The use cases hold the connection
/// mutex for the whole SQLite call, which must not park a runtime worker.
pub(crate) async fn blocking<T, F>(pool: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&DbPool) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    let pool = Arc::clone(pool);
    tokio::task::spawn_blocking(move || f(&pool))
        .await
        .map_err(|e| AppError::Db(format!("use case task failed: {}", e)))?
}
