use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::error::LinkError;
use crate::models::{CreateLinkRequest, LinkRecord};
use crate::service::LinkService;

pub struct AppState {
    pub service: Arc<LinkService>,
    pub started_at: Instant,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub timestamp: String,
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LinkError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message.clone()),
            LinkError::CodeTaken => (StatusCode::CONFLICT, self.to_string()),
            LinkError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            LinkError::GenerationExhausted { .. } | LinkError::StorageFailure(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Create a new short link
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkRecord>), LinkError> {
    let Json(payload) = payload.map_err(|rejection| LinkError::InvalidInput(rejection.body_text()))?;

    let record = state
        .service
        .create_link(&payload.url, payload.short_code.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// List all links, newest first
pub async fn list_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LinkRecord>>, LinkError> {
    Ok(Json(state.service.list_links().await?))
}

/// Get a link by code
pub async fn get_link(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<LinkRecord>, LinkError> {
    Ok(Json(state.service.get_link(&code).await?))
}

/// Delete a link
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<SuccessResponse>, LinkError> {
    state.service.delete_link(&code).await?;

    Ok(Json(SuccessResponse {
        message: "Link deleted successfully".to_string(),
    }))
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
