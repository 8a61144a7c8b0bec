use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Payload for `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    /// Version of the running binary.
    pub version: &'static str,
    /// Result of the database round-trip probe.
    pub db_healthy: bool,
}

/// GET /health
///
/// Liveness probe. Always answers 200; database reachability is reported
/// in the body rather than the status code.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = argus_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Health routes, mounted at root level rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
