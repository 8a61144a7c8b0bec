pub mod health;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sessions                        list, start
/// /sessions/{id}                   get
/// /sessions/{id}/pause             pause (POST)
/// /sessions/{id}/resume            resume (POST)
/// /sessions/{id}/stop              stop (POST, idempotent)
/// /sessions/{id}/abort             abort with reason (POST)
/// /sessions/{id}/interval          live interval change (PUT)
/// /sessions/{id}/statistics        statistics snapshot (GET)
/// /sessions/{id}/frames            frame history with defects (GET)
/// /sessions/{id}/report            full report (GET, ?granularity=)
/// /sessions/{id}/events            journaled event timeline (GET)
/// ```
///
/// The WebSocket event stream (`/ws`) and the health check (`/health`)
/// are mounted at root level by the router builder, not under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/sessions", sessions::router())
}
