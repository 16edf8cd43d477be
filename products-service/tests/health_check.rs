mod common;

use axum::http::StatusCode;
use common::TestApp;
use products_service::services::MockStore;
use serde_json::json;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::connected(MockStore::new());

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK", "service": "Products" }));
}

#[tokio::test]
async fn health_check_works_without_database() {
    let app = TestApp::disconnected();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Products");
}

#[tokio::test]
async fn health_check_ignores_failing_database() {
    let store = MockStore::new();
    store.set_failing(true);
    store.set_reachable(false);
    let app = TestApp::connected(store);

    let (status, _) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store().query_count(), 0);
}

#[tokio::test]
async fn readiness_reflects_connection_state() {
    let app = TestApp::disconnected();

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service unavailable");

    app.provider
        .install(std::sync::Arc::new(MockStore::new()))
        .await;

    let (status, body) = app.get("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::disconnected();

    let response = tower::util::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/health")
            .header("x-request-id", "req-42")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn metrics_endpoint_returns_text() {
    let app = TestApp::disconnected();

    let response = tower::util::ServiceExt::oneshot(
        app.router.clone(),
        axum::http::Request::builder()
            .uri("/metrics")
            .body(axum::body::Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}
