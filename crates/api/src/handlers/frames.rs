//! Handler for a session's frame history (PRD-42).

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use argus_core::error::CoreError;
use argus_core::types::DbId;
use argus_db::models::defect::DefectFindingRow;
use argus_db::models::frame::{Frame, FrameListQuery};
use argus_db::repositories::{DefectRepo, FrameRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// One frame joined with its defect findings.
#[derive(Debug, Serialize)]
pub struct FrameWithDefects {
    #[serde(flatten)]
    pub frame: Frame,
    pub defects: Vec<DefectFindingRow>,
}

/// GET /api/v1/sessions/{id}/frames
///
/// Page through a session's analyzed frames, newest first, each with its
/// defect findings. `defects_only=true` restricts the page to defective
/// frames. 404 for an unknown session (as opposed to an empty page for a
/// known session with no frames yet).
pub async fn list_frames(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<FrameListQuery>,
) -> AppResult<impl IntoResponse> {
    SessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "session",
            id,
        }))?;

    let frames = FrameRepo::list_for_session(&state.pool, id, &params).await?;

    let frame_ids: Vec<DbId> = frames.iter().map(|f| f.id).collect();
    let mut findings: HashMap<DbId, Vec<DefectFindingRow>> = HashMap::new();
    for row in DefectRepo::list_for_frames(&state.pool, &frame_ids).await? {
        findings.entry(row.frame_id).or_default().push(row);
    }

    let data: Vec<FrameWithDefects> = frames
        .into_iter()
        .map(|frame| {
            let defects = findings.remove(&frame.id).unwrap_or_default();
            FrameWithDefects { frame, defects }
        })
        .collect();

    Ok(Json(DataResponse { data }))
}
