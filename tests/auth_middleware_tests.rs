//! Router-level tests for the public health check and the media stream auth gate.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header::AUTHORIZATION};
use tower::ServiceExt;

use common::{AUTH_KEY, test_config, test_state};
use toothcall_gateway::create_app;

fn app() -> axum::Router {
    create_app(test_state(test_config("ws://127.0.0.1:9/v1/realtime")))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check_is_public() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Tooth call AI Voice Assistant is running!");
}

#[tokio::test]
async fn test_media_stream_without_header_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/media-stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "missing_auth_header");
}

#[tokio::test]
async fn test_media_stream_with_wrong_key_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/media-stream")
                .header(AUTHORIZATION, "Bearer not-the-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_media_stream_with_non_bearer_scheme_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/media-stream")
                .header(AUTHORIZATION, format!("Basic {AUTH_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_auth_header");
}

#[tokio::test]
async fn test_media_stream_with_valid_key_reaches_handler() {
    // Not a WebSocket handshake, so the upgrade extractor rejects it, but only
    // after authentication passed.
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/media-stream")
                .header(AUTHORIZATION, format!("Bearer {AUTH_KEY}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.status().is_client_error());
}
