//! Repository for the `session_events` table (PRD-44).

use sqlx::PgPool;

use argus_core::types::{DbId, Timestamp};

use crate::models::event::SessionEventRow;

/// Column list for `session_events` queries.
const COLUMNS: &str = "id, event_type, session_id, payload, created_at";

/// Maximum page size for event listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for event listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides read/write operations for the event journal.
pub struct EventRepo;

impl EventRepo {
    /// Insert a journal row, returning the generated ID.
    ///
    /// `created_at` comes from the in-process event timestamp rather than
    /// `NOW()` so the journal preserves publish order even when the writer
    /// task falls behind.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        session_id: Option<DbId>,
        payload: &serde_json::Value,
        timestamp: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO session_events (event_type, session_id, payload, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(session_id)
        .bind(payload)
        .bind(timestamp)
        .fetch_one(pool)
        .await
    }

    /// List a session's journal entries oldest-first with pagination.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SessionEventRow>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).max(1).min(MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM session_events \
             WHERE session_id = $1 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SessionEventRow>(&query)
            .bind(session_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
