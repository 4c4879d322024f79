use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;

use crate::service::LinkService;

use super::handlers::{create_link, delete_link, get_link, health_check, list_links, AppState};

pub fn create_api_router(service: Arc<LinkService>) -> Router {
    let state = Arc::new(AppState {
        service,
        started_at: Instant::now(),
    });

    Router::new()
        .route("/healthz", get(health_check))
        .route("/links", get(list_links).post(create_link))
        .route("/links/{code}", get(get_link).delete(delete_link))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
