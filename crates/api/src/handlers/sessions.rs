//! Handlers for the `/sessions` resource (PRD-41).
//!
//! Every write goes through the session engine ([`SessionManager`]), which
//! owns lifecycle ordering, device exclusivity and persistence; these
//! handlers translate HTTP to engine calls and serve the rows the engine
//! maintains. By the time an engine call returns, its row updates are
//! committed, so the follow-up read always reflects the action.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use argus_core::capture::CaptureConfig;
use argus_core::error::CoreError;
use argus_core::lifecycle::SessionState;
use argus_core::types::DbId;
use argus_db::models::session::{
    AbortRequest, CreateSession, InspectionSession, SessionListQuery, UpdateInterval,
};
use argus_db::repositories::SessionRepo;
use argus_db::DbPool;
use argus_session::EngineError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a session row or 404.
async fn find_session(pool: &DbPool, id: DbId) -> AppResult<InspectionSession> {
    SessionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "session",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Start an inspection session: validate the configuration, acquire the
/// camera, create the row and spawn the capture loop. Any failure before
/// the row exists leaves no trace. Returns 201 with the created session,
/// 400 on bad configuration, 409 if the camera is held by another live
/// session, 503 if the camera is unreachable.
pub async fn create_session(
    State(state): State<AppState>,
    Json(input): Json<CreateSession>,
) -> AppResult<impl IntoResponse> {
    let config = CaptureConfig {
        interval_ms: input
            .capture_interval_ms
            .unwrap_or(state.config.default_capture_interval_ms),
        source_id: input.source_id,
        auto_capture: input.auto_capture.unwrap_or(true),
    };

    let overview = state
        .manager
        .start_session(config, input.operator_id.as_deref())
        .await?;

    let session = find_session(&state.pool, overview.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

// ---------------------------------------------------------------------------
// List / get
// ---------------------------------------------------------------------------

/// GET /api/v1/sessions
///
/// List sessions newest-first. Supports optional `status`, `limit` and
/// `offset` query parameters; an unknown status value is rejected rather
/// than silently matching nothing.
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<SessionListQuery>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        if SessionState::from_status_str(status).is_none() {
            return Err(AppError::BadRequest(format!(
                "Unknown session status '{status}'"
            )));
        }
    }

    let sessions = SessionRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions/{id}/pause
///
/// Suspend capture without releasing the camera. 409 if the session
/// cannot pause from its current state.
pub async fn pause_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.manager.pause(id).await?;
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/resume
///
/// Resume a paused session. Capture continues on the existing timer
/// schedule; the pause does not restart it.
pub async fn resume_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.manager.resume(id).await?;
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/stop
///
/// Stop the session and release the camera. Idempotent: stopping an
/// already-stopped session returns the terminal row unchanged, even when
/// it finished before this process started.
pub async fn stop_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match state.manager.stop(id).await {
        Ok(_) => {}
        // No runtime for this id: the session may have finished before
        // this process started. A terminal row makes the retry a no-op;
        // anything else is a real conflict.
        Err(EngineError::Core(CoreError::NotFound { .. })) => {
            let session = find_session(&state.pool, id).await?;
            let terminal = SessionState::from_status_str(&session.status)
                .is_some_and(|s| s.is_terminal());
            if !terminal {
                return Err(AppError::Core(CoreError::Conflict(format!(
                    "Session {id} is not running in this engine"
                ))));
            }
            return Ok(Json(DataResponse { data: session }));
        }
        Err(e) => return Err(e.into()),
    }

    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/abort
///
/// Abort the session with a reason. 409 if the session is already
/// terminal.
pub async fn abort_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AbortRequest>,
) -> AppResult<impl IntoResponse> {
    let reason = input.reason.as_deref().unwrap_or("aborted by operator");
    state.manager.abort(id, reason).await?;
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/sessions/{id}/interval
///
/// Change the capture cadence of a running or paused session. The timer
/// restarts on the new interval immediately. 400 on a non-positive
/// interval, 409 on a terminal session.
pub async fn update_interval(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInterval>,
) -> AppResult<impl IntoResponse> {
    state
        .manager
        .set_interval(id, input.capture_interval_ms)
        .await?;
    let session = find_session(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}
