//! Shared helpers for API integration tests.
//!
//! These tests run without a live database: the pool is created lazily
//! against an address nothing listens on, so routing, extraction,
//! middleware and error mapping are exercised while any handler path that
//! actually reaches Postgres fails with a connection error.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use argus_analyzer::{DefectAnalyzer, HttpAnalyzer};
use argus_api::config::ServerConfig;
use argus_api::router::build_app_router;
use argus_api::state::AppState;
use argus_api::store::PgSessionStore;
use argus_events::EventBus;
use argus_session::source::{CameraGateway, SnapshotGateway};
use argus_session::store::SessionStore;
use argus_session::SessionManager;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and points the analyzer at a port nothing listens on.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        bind_addr: "127.0.0.1:0".parse().expect("test bind addr"),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        analyzer_base_url: "http://127.0.0.1:9".to_string(),
        analyzer_timeout_secs: 1,
        camera_timeout_secs: 1,
        default_capture_interval_ms: 1000,
    }
}

/// Build the full application router with all middleware layers, backed by
/// a real engine wired to unreachable collaborators.
///
/// This mirrors the construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app() -> Router {
    let config = test_config();

    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy("postgres://argus@127.0.0.1:9/argus_test")
        .expect("lazy test pool");

    let bus = Arc::new(EventBus::default());
    let camera: Arc<dyn CameraGateway> = Arc::new(SnapshotGateway::new(Duration::from_secs(
        config.camera_timeout_secs,
    )));
    let analyzer: Arc<dyn DefectAnalyzer> = Arc::new(HttpAnalyzer::new(
        config.analyzer_base_url.clone(),
        Duration::from_secs(config.analyzer_timeout_secs),
    ));
    let store: Arc<dyn SessionStore> = Arc::new(PgSessionStore::new(pool.clone()));
    let manager = SessionManager::new(camera, analyzer, store, Arc::clone(&bus));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        manager,
        bus,
    };

    build_app_router(state, &config)
}

/// Perform a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    app.oneshot(request).await.expect("response")
}

/// Perform a POST request with an empty body.
pub async fn post(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    app.oneshot(request).await.expect("response")
}

/// Perform a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    app.oneshot(request).await.expect("response")
}

/// Perform a PUT request with a JSON body.
pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    app.oneshot(request).await.expect("response")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
