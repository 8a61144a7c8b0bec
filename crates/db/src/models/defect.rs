//! Defect finding entity models (PRD-42).

use serde::Serialize;
use sqlx::FromRow;

use argus_core::types::{DbId, Timestamp};

/// A row from the `defect_findings` table.
///
/// `session_id` duplicates the owning frame's session so per-session
/// distribution queries do not need a join. `severity` is constrained to
/// the `argus_core::severity` vocabulary by a CHECK constraint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DefectFindingRow {
    pub id: DbId,
    pub frame_id: DbId,
    pub session_id: DbId,
    pub label: String,
    pub confidence: f64,
    pub severity: String,
    pub area_pct: f64,
    pub bounding_box: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for inserting a defect finding alongside its frame.
#[derive(Debug, Clone)]
pub struct NewDefectFinding {
    pub label: String,
    pub confidence: f64,
    pub severity: String,
    pub area_pct: f64,
    pub bounding_box: serde_json::Value,
}
