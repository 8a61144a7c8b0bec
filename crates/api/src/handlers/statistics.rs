//! Handler for the session statistics snapshot (PRD-43).

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use argus_core::error::CoreError;
use argus_core::stats::{RunningStats, SessionStatistics};
use argus_core::types::DbId;
use argus_db::models::session::InspectionSession;
use argus_db::repositories::{DefectRepo, FrameRepo, SessionRepo};
use argus_db::DbPool;
use argus_session::EngineError;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::store::frame_observations;

/// GET /api/v1/sessions/{id}/statistics
///
/// Point-in-time statistics. Sessions resident in the engine are served
/// from the live aggregator; anything else (finished before this process
/// started) is recomputed from rows through the same aggregation code,
/// which is why the two paths cannot drift apart.
pub async fn session_statistics(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match state.manager.statistics(id).await {
        Ok(stats) => Ok(Json(DataResponse { data: stats })),
        Err(EngineError::Core(CoreError::NotFound { .. })) => {
            let session = SessionRepo::find_by_id(&state.pool, id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "session",
                    id,
                }))?;
            let stats = recompute(&state.pool, &session).await?;
            Ok(Json(DataResponse { data: stats }))
        }
        Err(e) => Err(e.into()),
    }
}

/// Rebuild statistics for a session with no live aggregator.
async fn recompute(pool: &DbPool, session: &InspectionSession) -> AppResult<SessionStatistics> {
    let frames = FrameRepo::list_all_for_session(pool, session.id).await?;
    let defects = DefectRepo::list_for_session(pool, session.id).await?;

    let mut running = RunningStats::new();
    for observation in frame_observations(&frames, defects) {
        running.ingest(&observation);
    }

    // Terminal sessions freeze their capture-rate window at the end time.
    let elapsed = session.ended_at.unwrap_or_else(Utc::now) - session.started_at;
    Ok(running.snapshot(elapsed))
}
