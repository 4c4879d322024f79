//! Redirect integration tests
//!
//! These tests exercise the redirect router on its own: status selection,
//! Location normalisation, timing header, and click accounting.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use snaplink::redirect::{self, middleware::TIMING_HEADER};
use snaplink::service::LinkService;
use snaplink::storage::{MemoryStorage, SqliteStorage, Storage};
use std::sync::Arc;
use tower::ServiceExt;

/// Helper to create test storage
async fn create_test_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

fn redirect_router(storage: &Arc<dyn Storage>, status: StatusCode) -> Router {
    let service = Arc::new(LinkService::new(Arc::clone(storage)));
    redirect::create_redirect_router(service, status)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_redirect_uses_configured_status() {
    let storage = create_test_storage().await;
    storage
        .put("status1", "https://example.com/destination")
        .await
        .unwrap();

    for status in [
        StatusCode::MOVED_PERMANENTLY,
        StatusCode::FOUND,
        StatusCode::TEMPORARY_REDIRECT,
        StatusCode::PERMANENT_REDIRECT,
    ] {
        let app = redirect_router(&storage, status);
        let response = app.oneshot(get("/status1")).await.unwrap();

        assert_eq!(response.status(), status);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://example.com/destination"
        );
        assert!(response.headers().contains_key(TIMING_HEADER));
    }

    assert_eq!(storage.get("status1").await.unwrap().clicks, 4);
}

#[tokio::test]
async fn test_redirect_location_is_ascii_encoded() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    storage
        .put("intl12", "https://example.com/café?q=a b")
        .await
        .unwrap();

    let app = redirect_router(&storage, StatusCode::TEMPORARY_REDIRECT);
    let response = app.oneshot(get("/intl12")).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/caf%C3%A9?q=a%20b"
    );
}

#[tokio::test]
async fn test_redirect_location_gains_root_path() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    storage.put("bare12", "https://example.com").await.unwrap();

    let app = redirect_router(&storage, StatusCode::TEMPORARY_REDIRECT);
    let response = app.oneshot(get("/bare12")).await.unwrap();

    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/"
    );
    // Stored value is untouched
    assert_eq!(
        storage.get("bare12").await.unwrap().original_url,
        "https://example.com"
    );
}

#[tokio::test]
async fn test_redirect_missing_code_is_404() {
    let storage = create_test_storage().await;
    let app = redirect_router(&storage, StatusCode::TEMPORARY_REDIRECT);

    let response = app.oneshot(get("/miss99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Link not found");
}

#[tokio::test]
async fn test_sequential_redirects_update_last_clicked() {
    let storage = create_test_storage().await;
    storage.put("seq123", "https://example.com").await.unwrap();
    let app = redirect_router(&storage, StatusCode::TEMPORARY_REDIRECT);

    app.clone().oneshot(get("/seq123")).await.unwrap();
    let first = storage.get("seq123").await.unwrap();
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
    app.oneshot(get("/seq123")).await.unwrap();
    let second = storage.get("seq123").await.unwrap();

    assert_eq!(first.clicks, 1);
    assert_eq!(second.clicks, 2);
    assert!(second.last_clicked_at > first.last_clicked_at);
    assert_eq!(second.updated_at, second.last_clicked_at.unwrap());
    assert_eq!(second.created_at, first.created_at);
}
