use anyhow::Result;
use axum::{http::StatusCode, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::create_api_router;
use crate::config::{Config, DatabaseBackend};
use crate::redirect::create_redirect_router;
use crate::service::LinkService;
use crate::storage::{MemoryStorage, PostgresStorage, SqliteStorage, Storage, TimeoutStorage};

/// Open the configured backend, create its schema and bound every call with
/// the configured storage timeout.
pub async fn open_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.database.backend {
        DatabaseBackend::Sqlite => {
            info!("Using SQLite storage: {}", config.database.url);
            Arc::new(SqliteStorage::new(&config.database.url, config.database.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            info!("Using PostgreSQL storage");
            Arc::new(
                PostgresStorage::new(&config.database.url, config.database.max_connections).await?,
            )
        }
        DatabaseBackend::Memory => {
            info!("Using in-memory storage, links will not survive a restart");
            Arc::new(MemoryStorage::new())
        }
    };

    storage.init().await?;

    Ok(Arc::new(TimeoutStorage::new(storage, config.storage_timeout())))
}

/// Full HTTP surface: the `/links` API, `/healthz` and `/{code}` redirects.
pub fn create_app(service: Arc<LinkService>, redirect_status: StatusCode) -> Router {
    create_api_router(Arc::clone(&service))
        .merge(create_redirect_router(service, redirect_status))
        .layer(TraceLayer::new_for_http())
}
