//! Engine-level error taxonomy.

use argus_core::error::CoreError;
use argus_core::types::DbId;

/// Failure from the session persistence collaborator.
///
/// Carries a message only: the engine treats storage as opaque and
/// never branches on the concrete database error.
#[derive(Debug, thiserror::Error)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(source: impl std::fmt::Display) -> Self {
        Self(source.to_string())
    }
}

/// Errors surfaced by the session engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The camera could not be acquired; the session was never created.
    #[error("camera '{source_id}' unavailable: {reason}")]
    DeviceUnavailable { source_id: String, reason: String },

    /// Another live session already holds this camera.
    #[error("camera '{source_id}' is already in use by session {session_id}")]
    DeviceBusy { source_id: String, session_id: DbId },

    /// Frame capture failed mid-session; the session is aborted.
    #[error("frame capture failed: {0}")]
    CaptureFailed(String),

    /// A previous submission has not resolved yet.
    ///
    /// The scheduler checks the busy flag before capturing, so this only
    /// surfaces if a caller bypasses the tick loop.
    #[error("a frame submission is already in flight")]
    AlreadyInFlight,

    /// Validation, conflict, or not-found from the domain layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
