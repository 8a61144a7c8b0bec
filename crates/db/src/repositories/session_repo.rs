//! Repository for the `inspection_sessions` table (PRD-41).
//!
//! Status values come from `argus_core::lifecycle` — no string literals
//! in queries. Lifecycle transitions are enforced by the engine before a
//! write happens, so the UPDATE methods here are deliberately dumb.

use sqlx::PgPool;

use argus_core::lifecycle::{STATUS_ABORTED, STATUS_ACTIVE, STATUS_COMPLETED, STATUS_PAUSED};
use argus_core::types::{DbId, Timestamp};

use crate::models::session::{InspectionSession, SessionListQuery};

/// Column list for `inspection_sessions` queries.
const COLUMNS: &str = "\
    id, source_id, operator_id, status, capture_interval_ms, auto_capture, \
    started_at, ended_at, abort_reason, \
    total_frames, good_frames, defect_frames, \
    created_at, updated_at";

/// Maximum page size for session listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for session listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for inspection sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session in `active` status, returning the created row.
    ///
    /// Sessions are born running: the row is created only after the engine
    /// has acquired the camera, so there is no `idle` status in the table.
    pub async fn create(
        pool: &PgPool,
        source_id: &str,
        operator_id: Option<&str>,
        capture_interval_ms: i64,
        auto_capture: bool,
    ) -> Result<InspectionSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO inspection_sessions \
                (source_id, operator_id, status, capture_interval_ms, auto_capture, started_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InspectionSession>(&query)
            .bind(source_id)
            .bind(operator_id)
            .bind(STATUS_ACTIVE)
            .bind(capture_interval_ms)
            .bind(auto_capture)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InspectionSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inspection_sessions WHERE id = $1");
        sqlx::query_as::<_, InspectionSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List sessions newest-first with optional status filter and pagination.
    pub async fn list(
        pool: &PgPool,
        params: &SessionListQuery,
    ) -> Result<Vec<InspectionSession>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(1).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let where_clause = if params.status.is_some() {
            "WHERE status = $3"
        } else {
            ""
        };

        let query = format!(
            "SELECT {COLUMNS} FROM inspection_sessions \
             {where_clause} \
             ORDER BY started_at DESC \
             LIMIT $1 OFFSET $2"
        );

        let mut q = sqlx::query_as::<_, InspectionSession>(&query)
            .bind(limit)
            .bind(offset);
        if let Some(status) = &params.status {
            q = q.bind(status);
        }
        q.fetch_all(pool).await
    }

    /// Set the status for a pause/resume transition. Guarded to
    /// non-terminal rows so a late pause can never overwrite a completed
    /// or aborted session. Returns `true` if the row was updated.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inspection_sessions \
             SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ($3, $4)",
        )
        .bind(id)
        .bind(status)
        .bind(STATUS_ACTIVE)
        .bind(STATUS_PAUSED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a session as completed with the engine-stamped end time.
    ///
    /// No-op on rows already terminal, which makes a repeated stop
    /// harmless. Returns `true` if the row transitioned.
    pub async fn mark_stopped(
        pool: &PgPool,
        id: DbId,
        ended_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inspection_sessions \
             SET status = $2, ended_at = $3, updated_at = NOW() \
             WHERE id = $1 AND status IN ($4, $5)",
        )
        .bind(id)
        .bind(STATUS_COMPLETED)
        .bind(ended_at)
        .bind(STATUS_ACTIVE)
        .bind(STATUS_PAUSED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a session as aborted with the reason and engine-stamped end
    /// time. No-op on rows already terminal.
    pub async fn mark_aborted(
        pool: &PgPool,
        id: DbId,
        reason: &str,
        ended_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inspection_sessions \
             SET status = $2, abort_reason = $3, ended_at = $4, updated_at = NOW() \
             WHERE id = $1 AND status IN ($5, $6)",
        )
        .bind(id)
        .bind(STATUS_ABORTED)
        .bind(reason)
        .bind(ended_at)
        .bind(STATUS_ACTIVE)
        .bind(STATUS_PAUSED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the capture interval after a live reconfiguration.
    pub async fn update_interval(
        pool: &PgPool,
        id: DbId,
        capture_interval_ms: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inspection_sessions \
             SET capture_interval_ms = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(capture_interval_ms)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Overwrite the frame counters with the aggregator's current totals.
    ///
    /// Absolute SETs, not increments: the in-memory aggregator is the
    /// source of truth while a session runs, and absolute writes make the
    /// update idempotent under replays.
    pub async fn update_counters(
        pool: &PgPool,
        id: DbId,
        total_frames: i64,
        good_frames: i64,
        defect_frames: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE inspection_sessions \
             SET total_frames = $2, good_frames = $3, defect_frames = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(total_frames)
        .bind(good_frames)
        .bind(defect_frames)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Abort every session still marked as running.
    ///
    /// Called once at startup: rows left in `active` or `paused` belong to
    /// a previous process that died without releasing them. Returns the
    /// number of sessions reaped.
    pub async fn abort_stale_running(
        pool: &PgPool,
        reason: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE inspection_sessions \
             SET status = $1, abort_reason = $2, ended_at = NOW(), updated_at = NOW() \
             WHERE status IN ($3, $4)",
        )
        .bind(STATUS_ABORTED)
        .bind(reason)
        .bind(STATUS_ACTIVE)
        .bind(STATUS_PAUSED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
