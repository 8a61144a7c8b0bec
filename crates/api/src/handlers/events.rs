//! Handler for a session's journaled event timeline (PRD-44).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use argus_core::error::CoreError;
use argus_core::types::DbId;
use argus_db::repositories::{EventRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/sessions/{id}/events
///
/// The session's journal entries oldest-first, so the timeline reads
/// top-to-bottom: started, paused, resumed, frames, terminal.
pub async fn list_session_events(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    SessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "session",
            id,
        }))?;

    let events = EventRepo::list_for_session(&state.pool, id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: events }))
}
