//! Event journal entity models (PRD-44).

use serde::Serialize;
use sqlx::FromRow;

use argus_core::types::{DbId, Timestamp};

/// A row from the `session_events` table.
///
/// `event_type` holds the dot-separated name from
/// `argus_core::event_names` (e.g. `"session.started"`). `session_id` is
/// `NULL` for engine-level events that are not tied to one session.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionEventRow {
    pub id: DbId,
    pub event_type: String,
    pub session_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
