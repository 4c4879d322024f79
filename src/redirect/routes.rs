use axum::{http::StatusCode, middleware, routing::get, Router};
use std::sync::Arc;

use crate::service::LinkService;

use super::handlers::{redirect_url, RedirectState};
use super::middleware::timing_header;
use super::resolver::RedirectResolver;

pub fn create_redirect_router(service: Arc<LinkService>, redirect_status: StatusCode) -> Router {
    let state = Arc::new(RedirectState {
        resolver: RedirectResolver::new(service),
        redirect_status,
    });

    Router::new()
        .route("/{code}", get(redirect_url))
        .layer(middleware::from_fn(timing_header))
        .with_state(state)
}
