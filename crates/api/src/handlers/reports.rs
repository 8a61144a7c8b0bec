//! Handler for the full session report (PRD-43).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use argus_core::error::CoreError;
use argus_core::report::{build_report, TrendGranularity};
use argus_core::types::DbId;
use argus_db::repositories::{DefectRepo, FrameRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::store::{frame_observations, overview_from_row};

/// Query parameters for the report endpoint.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Trend bucket width, `hourly` (default) or `daily`.
    pub granularity: Option<TrendGranularity>,
}

/// GET /api/v1/sessions/{id}/report
///
/// Build the full report from persisted rows. A running session's report
/// covers exactly what has been written so far; a finished session's
/// report is reproducible from rows alone.
pub async fn session_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let session = SessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "session",
            id,
        }))?;

    let frames = FrameRepo::list_all_for_session(&state.pool, id).await?;
    let defects = DefectRepo::list_for_session(&state.pool, id).await?;
    let observations = frame_observations(&frames, defects);

    let report = build_report(
        &overview_from_row(&session),
        &observations,
        query.granularity.unwrap_or_default(),
        Utc::now(),
    )?;

    Ok(Json(DataResponse { data: report }))
}
