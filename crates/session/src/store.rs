//! Session persistence collaborator.
//!
//! The engine writes through this trait only; the Postgres-backed
//! implementation lives in the API crate on top of `argus-db`. Keeping
//! the seam here lets the engine tests run against an in-memory store.

use async_trait::async_trait;

use argus_core::capture::CaptureConfig;
use argus_core::stats::{FrameObservation, SessionCounters};
use argus_core::types::{DbId, Timestamp};

use crate::error::StoreError;

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Aborted,
}

/// Write-side persistence for sessions, frames and counters.
///
/// The in-memory aggregator is authoritative while a session runs;
/// these writes mirror its state so a finished or crashed session can
/// still be reported from rows alone.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create the session row (born `active`), returning its ID.
    async fn create_session(
        &self,
        operator_id: Option<&str>,
        config: &CaptureConfig,
    ) -> Result<DbId, StoreError>;

    /// Persist one analyzed frame with its defect findings, returning
    /// the frame ID.
    async fn append_frame(
        &self,
        session_id: DbId,
        frame: &FrameObservation,
    ) -> Result<DbId, StoreError>;

    /// Mirror the aggregator's counters onto the session row.
    async fn update_counters(
        &self,
        session_id: DbId,
        counters: SessionCounters,
    ) -> Result<(), StoreError>;

    /// Record a pause/resume status flip.
    async fn update_status(&self, session_id: DbId, status: &str) -> Result<(), StoreError>;

    /// Record a live capture-interval change.
    async fn update_interval(
        &self,
        session_id: DbId,
        capture_interval_ms: i64,
    ) -> Result<(), StoreError>;

    /// Close the session row with its terminal status, end time and
    /// final counters. `abort_reason` is only meaningful for
    /// [`SessionOutcome::Aborted`].
    async fn finalize(
        &self,
        session_id: DbId,
        outcome: SessionOutcome,
        ended_at: Timestamp,
        counters: SessionCounters,
        abort_reason: Option<&str>,
    ) -> Result<(), StoreError>;
}
