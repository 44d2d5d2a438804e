use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::MockServer;

use crate::cli::commands::serve::router;
use crate::test_support::{executor_for, seller_store, settings_for};

async fn app(mock: &MockServer) -> axum::Router {
    router(
        Arc::new(executor_for(mock, seller_store("token"))),
        Arc::new(settings_for(mock)),
        CancellationToken::new(),
    )
}

#[tokio::test]
async fn test_health() {
    let mock = MockServer::start().await;

    let response = app(&mock)
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "ebay-mcp");
    assert!(mock.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mcp_is_mounted() {
    let mock = MockServer::start().await;

    let response = app(&mock)
        .await
        .oneshot(Request::builder().uri("/mcp").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_path() {
    let mock = MockServer::start().await;

    let response = app(&mock)
        .await
        .oneshot(
            Request::builder()
                .uri("/tools")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
