//! Inspection session entity models and DTOs (PRD-41).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use argus_core::types::{DbId, Timestamp};

/// A row from the `inspection_sessions` table.
///
/// `status` holds one of the lifecycle constants from
/// `argus_core::lifecycle` (`active`, `paused`, `completed`, `aborted`);
/// the database enforces the same set with a CHECK constraint. The frame
/// counters are absolute values written by the engine after each accepted
/// frame, so a crash can lose at most the frames of the current run.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InspectionSession {
    pub id: DbId,
    pub source_id: String,
    pub operator_id: Option<String>,
    pub status: String,
    pub capture_interval_ms: i64,
    pub auto_capture: bool,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub abort_reason: Option<String>,
    pub total_frames: i64,
    pub good_frames: i64,
    pub defect_frames: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for starting a session via `POST /api/v1/sessions`.
#[derive(Debug, Deserialize)]
pub struct CreateSession {
    /// Identifier of the camera to capture from.
    pub source_id: String,
    /// Opaque identifier of the operator starting the session.
    pub operator_id: Option<String>,
    /// Capture cadence in milliseconds. Defaults to
    /// [`argus_core::capture::DEFAULT_CAPTURE_INTERVAL_MS`].
    pub capture_interval_ms: Option<i64>,
    /// Whether the periodic capture loop runs. Defaults to `true`.
    pub auto_capture: Option<bool>,
}

/// Query parameters for `GET /api/v1/sessions`.
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    /// Filter by lifecycle status (e.g. `"active"`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// DTO for `PUT /api/v1/sessions/{id}/interval`.
#[derive(Debug, Deserialize)]
pub struct UpdateInterval {
    pub capture_interval_ms: i64,
}

/// DTO for `POST /api/v1/sessions/{id}/abort`.
#[derive(Debug, Deserialize)]
pub struct AbortRequest {
    pub reason: Option<String>,
}
