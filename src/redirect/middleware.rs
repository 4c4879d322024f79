use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// Wall-clock time spent serving a redirect, in milliseconds.
pub const TIMING_HEADER: &str = "x-snaplink-timing-total-ms";

pub async fn timing_header(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(request).await;

    if response.status().is_redirection() {
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        response
            .headers_mut()
            .insert(HeaderName::from_static(TIMING_HEADER), HeaderValue::from(elapsed_ms));
    }

    response
}
