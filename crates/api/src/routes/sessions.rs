//! Route definitions for the `/sessions` resource (PRD-41..44).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{events, frames, reports, sessions, statistics};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /                  -> list_sessions
/// POST   /                  -> create_session
/// GET    /{id}              -> get_session
/// POST   /{id}/pause        -> pause_session
/// POST   /{id}/resume       -> resume_session
/// POST   /{id}/stop         -> stop_session
/// POST   /{id}/abort        -> abort_session
/// PUT    /{id}/interval     -> update_interval
/// GET    /{id}/statistics   -> session_statistics
/// GET    /{id}/frames       -> list_frames
/// GET    /{id}/report       -> session_report
/// GET    /{id}/events       -> list_session_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route("/{id}", get(sessions::get_session))
        .route("/{id}/pause", post(sessions::pause_session))
        .route("/{id}/resume", post(sessions::resume_session))
        .route("/{id}/stop", post(sessions::stop_session))
        .route("/{id}/abort", post(sessions::abort_session))
        .route("/{id}/interval", put(sessions::update_interval))
        .route("/{id}/statistics", get(statistics::session_statistics))
        .route("/{id}/frames", get(frames::list_frames))
        .route("/{id}/report", get(reports::session_report))
        .route("/{id}/events", get(events::list_session_events))
}
