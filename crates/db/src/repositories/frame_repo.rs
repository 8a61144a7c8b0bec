//! Repository for the `frames` table (PRD-42).

use sqlx::PgPool;

use argus_core::types::DbId;

use crate::models::defect::NewDefectFinding;
use crate::models::frame::{Frame, FrameListQuery, NewFrame};

/// Column list for `frames` queries.
const COLUMNS: &str = "\
    id, session_id, captured_at, is_defect, anomaly_score, \
    preprocess_ms, anomaly_ms, classify_ms, postprocess_ms, \
    created_at";

/// Maximum page size for frame listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for frame listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides read/write operations for analyzed frames.
pub struct FrameRepo;

impl FrameRepo {
    /// Insert a frame and its defect findings in one transaction,
    /// returning the generated frame ID.
    ///
    /// A frame row without its findings would corrupt the defect
    /// distributions rebuilt from history, so the two writes commit
    /// together or not at all.
    pub async fn insert_with_defects(
        pool: &PgPool,
        frame: &NewFrame,
        defects: &[NewDefectFinding],
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let frame_id: DbId = sqlx::query_scalar(
            "INSERT INTO frames \
                (session_id, captured_at, is_defect, anomaly_score, \
                 preprocess_ms, anomaly_ms, classify_ms, postprocess_ms) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(frame.session_id)
        .bind(frame.captured_at)
        .bind(frame.is_defect)
        .bind(frame.anomaly_score)
        .bind(frame.preprocess_ms)
        .bind(frame.anomaly_ms)
        .bind(frame.classify_ms)
        .bind(frame.postprocess_ms)
        .fetch_one(&mut *tx)
        .await?;

        for defect in defects {
            sqlx::query(
                "INSERT INTO defect_findings \
                    (frame_id, session_id, label, confidence, severity, area_pct, bounding_box) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(frame_id)
            .bind(frame.session_id)
            .bind(&defect.label)
            .bind(defect.confidence)
            .bind(&defect.severity)
            .bind(defect.area_pct)
            .bind(&defect.bounding_box)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(frame_id)
    }

    /// List a session's frames newest-first with pagination.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
        params: &FrameListQuery,
    ) -> Result<Vec<Frame>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let defect_clause = if params.defects_only.unwrap_or(false) {
            "AND is_defect = true"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM frames \
             WHERE session_id = $1 {defect_clause} \
             ORDER BY captured_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Frame>(&query)
            .bind(session_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Load a session's complete frame history in capture order.
    ///
    /// Used to rebuild statistics and reports for sessions that are no
    /// longer resident in the engine.
    pub async fn list_all_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Frame>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM frames \
             WHERE session_id = $1 \
             ORDER BY captured_at ASC, id ASC"
        );
        sqlx::query_as::<_, Frame>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
