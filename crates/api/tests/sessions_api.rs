//! Integration tests for the `/api/v1/sessions` surface: request
//! validation, engine error mapping and not-found behaviour. Everything
//! here must fail before a database query would run.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, get, post, post_json, put_json};
use serde_json::json;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: starting with a non-positive interval is rejected up front
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_rejects_non_positive_interval() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/sessions",
        json!({ "source_id": "http://cam-1.local/snapshot", "capture_interval_ms": 0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("interval"));
}

// ---------------------------------------------------------------------------
// Test: starting with a blank source is rejected up front
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_rejects_blank_source() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/sessions",
        json!({ "source_id": "   " }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: an unreachable camera maps to 503 and creates nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_with_unreachable_camera_returns_503() {
    let app = common::build_test_app();

    // Nothing listens on port 9, so the acquire probe fails before the
    // engine would touch the database.
    let response = post_json(
        app,
        "/api/v1/sessions",
        json!({ "source_id": "http://127.0.0.1:9/snapshot" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["code"], "DEVICE_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Test: malformed JSON bodies are rejected by the extractor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_rejects_malformed_json() {
    let app = common::build_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/sessions")
        .header("content-type", "application/json")
        .body(Body::from("this is not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: lifecycle actions on an unknown session return 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pause_unknown_session_returns_404() {
    let app = common::build_test_app();
    let response = post(app, "/api/v1/sessions/9999/pause").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap().contains("9999"));
}

#[tokio::test]
async fn resume_unknown_session_returns_404() {
    let response = post(common::build_test_app(), "/api/v1/sessions/9999/resume").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn abort_unknown_session_returns_404() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/sessions/9999/abort",
        json!({ "reason": "test shutdown" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interval_change_on_unknown_session_returns_404() {
    let app = common::build_test_app();
    let response = put_json(
        app,
        "/api/v1/sessions/9999/interval",
        json!({ "capture_interval_ms": 250 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: the list endpoint rejects unknown status filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_sessions_rejects_unknown_status_filter() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/sessions?status=bogus").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].as_str().unwrap().contains("bogus"));
}
