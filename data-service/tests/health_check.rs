mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{get, healthy_store, router_with, unreachable_store};
use http_body_util::BodyExt;
use service_core::middleware::REQUEST_ID_HEADER;
use tower::util::ServiceExt;

// =============================================================================
// /health
// =============================================================================

#[tokio::test]
async fn health_is_200_in_every_store_state() {
    let routers = [
        router_with(Some(healthy_store())),
        router_with(Some(unreachable_store())),
        router_with(None),
    ];

    for app in &routers {
        let (status, body) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "healthy"}));
    }
}

// =============================================================================
// /ready
// =============================================================================

#[tokio::test]
async fn ready_when_store_answers_ping() {
    let app = router_with(Some(healthy_store()));

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"status": "ready"}));
}

#[tokio::test]
async fn ready_without_store_handle() {
    // No handle means no ping is attempted, so nothing can fail.
    let app = router_with(None);

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn not_ready_when_ping_fails() {
    let app = router_with(Some(unreachable_store()));

    let (status, body) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not ready");
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn readiness_follows_store_recovery() {
    let store = unreachable_store();
    let app = router_with(Some(store.clone()));

    let (status, _) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    store.set_healthy(true);

    let (status, _) = get(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// /
// =============================================================================

#[tokio::test]
async fn index_reports_healthy() {
    let app = router_with(Some(healthy_store()));

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the data service!");
    assert_eq!(body["status"], "healthy");
    assert!(body["current_time"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn index_is_healthy_without_store_handle() {
    let app = router_with(None);

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn index_degrades_in_body_not_status() {
    let app = router_with(Some(unreachable_store()));

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Server selection timeout"));
    assert!(body["current_time"].is_string());
}

// =============================================================================
// Ambient
// =============================================================================

#[tokio::test]
async fn metrics_endpoint_returns_text() {
    let app = router_with(None);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert!(!body.is_empty());
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = router_with(None);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "probe-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "probe-1");
}
