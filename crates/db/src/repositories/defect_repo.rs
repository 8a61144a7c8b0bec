//! Repository for the `defect_findings` table (PRD-42).
//!
//! Writes happen in `FrameRepo::insert_with_defects` so a frame and its
//! findings share one transaction; this repo only reads.

use sqlx::PgPool;

use argus_core::types::DbId;

use crate::models::defect::DefectFindingRow;

/// Column list for `defect_findings` queries.
const COLUMNS: &str = "\
    id, frame_id, session_id, label, confidence, severity, area_pct, \
    bounding_box, created_at";

/// Provides read operations for defect findings.
pub struct DefectRepo;

impl DefectRepo {
    /// List every finding for a session, grouped by frame.
    ///
    /// Ordered by `frame_id` so callers can zip the result against the
    /// session's frame history without a per-frame query.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<DefectFindingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defect_findings \
             WHERE session_id = $1 \
             ORDER BY frame_id ASC, id ASC"
        );
        sqlx::query_as::<_, DefectFindingRow>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// List the findings for a set of frames (one page of history).
    ///
    /// Same ordering contract as [`DefectRepo::list_for_session`], scoped
    /// to the given frame IDs via `= ANY`.
    pub async fn list_for_frames(
        pool: &PgPool,
        frame_ids: &[DbId],
    ) -> Result<Vec<DefectFindingRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM defect_findings \
             WHERE frame_id = ANY($1) \
             ORDER BY frame_id ASC, id ASC"
        );
        sqlx::query_as::<_, DefectFindingRow>(&query)
            .bind(frame_ids)
            .fetch_all(pool)
            .await
    }
}
