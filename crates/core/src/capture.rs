//! Capture configuration constants, types, and validation (PRD-41).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Capture interval used when the session initiator does not supply one.
pub const DEFAULT_CAPTURE_INTERVAL_MS: i64 = 1000;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Per-session capture configuration supplied by the session initiator.
///
/// This is the entire runtime configuration surface of a session: cadence,
/// which camera to pull from, and whether the capture loop runs at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Milliseconds between capture ticks. Must be positive.
    pub interval_ms: i64,
    /// Opaque camera/source identifier; interpreted by the camera gateway.
    pub source_id: String,
    /// When false, the session holds its device but no capture tick fires.
    pub auto_capture: bool,
}

impl CaptureConfig {
    /// The tick period as a std `Duration` for timer construction.
    ///
    /// Callers must have validated the interval first; a non-positive value
    /// degenerates to zero here rather than panicking on the cast.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms.max(0) as u64)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a capture interval in milliseconds.
///
/// Zero and negative intervals are rejected; there is deliberately no upper
/// bound (very slow inspection cadences are legitimate).
pub fn validate_capture_interval(interval_ms: i64) -> Result<(), CoreError> {
    if interval_ms <= 0 {
        return Err(CoreError::Validation(format!(
            "Capture interval must be a positive number of milliseconds, got {interval_ms}"
        )));
    }
    Ok(())
}

/// Validate a full capture configuration.
pub fn validate_capture_config(config: &CaptureConfig) -> Result<(), CoreError> {
    validate_capture_interval(config.interval_ms)?;
    if config.source_id.trim().is_empty() {
        return Err(CoreError::Validation(
            "Capture source id must not be empty".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
