//! Captured frame entity models and DTOs (PRD-42).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use argus_core::types::{DbId, Timestamp};

/// A row from the `frames` table.
///
/// One row per frame that completed analysis. Frames whose capture or
/// analysis failed are dropped and never reach this table, so the row
/// count per session matches the session's `total_frames` counter.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Frame {
    pub id: DbId,
    pub session_id: DbId,
    pub captured_at: Timestamp,
    pub is_defect: bool,
    pub anomaly_score: f64,
    pub preprocess_ms: f64,
    pub anomaly_ms: f64,
    pub classify_ms: f64,
    pub postprocess_ms: f64,
    pub created_at: Timestamp,
}

/// DTO for inserting an analyzed frame.
#[derive(Debug, Clone)]
pub struct NewFrame {
    pub session_id: DbId,
    pub captured_at: Timestamp,
    pub is_defect: bool,
    pub anomaly_score: f64,
    pub preprocess_ms: f64,
    pub anomaly_ms: f64,
    pub classify_ms: f64,
    pub postprocess_ms: f64,
}

/// Query parameters for `GET /api/v1/sessions/{id}/frames`.
#[derive(Debug, Deserialize)]
pub struct FrameListQuery {
    /// When `true`, only frames with at least one defect finding.
    pub defects_only: Option<bool>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
