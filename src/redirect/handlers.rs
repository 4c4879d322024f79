use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use url::Url;

use super::resolver::RedirectResolver;
use crate::error::LinkError;

pub struct RedirectState {
    pub resolver: RedirectResolver,
    pub redirect_status: StatusCode,
}

/// Redirect to original URL
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    Path(code): Path<String>,
) -> Response {
    match state.resolver.resolve(&code).await {
        Ok(destination) => {
            // Re-serialize through Url so the Location header is always ASCII
            let location = Url::parse(&destination)
                .ok()
                .and_then(|url| HeaderValue::from_str(url.as_str()).ok());

            match location {
                Some(location) => {
                    (state.redirect_status, [(header::LOCATION, location)]).into_response()
                }
                None => {
                    tracing::error!(short_code = %code, destination = %destination, "stored destination is not a valid Location");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
                }
            }
        }
        Err(LinkError::NotFound) => (StatusCode::NOT_FOUND, "Link not found").into_response(),
        Err(err) => {
            tracing::error!(short_code = %code, error = %err, "redirect failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong").into_response()
        }
    }
}
