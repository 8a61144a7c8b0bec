//! Well-known event type constants for the session event stream (PRD-44).
//!
//! Used by the engine when publishing to the event bus, by the journal when
//! persisting to `session_events`, and by WebSocket clients to dispatch on
//! `event_type`.

/// A session was started and its capture device acquired.
pub const EVENT_SESSION_STARTED: &str = "session.started";

/// Capture was suspended; the device stays acquired.
pub const EVENT_SESSION_PAUSED: &str = "session.paused";

/// Capture resumed after a pause.
pub const EVENT_SESSION_RESUMED: &str = "session.resumed";

/// The session was stopped normally and finalized.
pub const EVENT_SESSION_STOPPED: &str = "session.stopped";

/// The session was aborted (user request or device failure).
pub const EVENT_SESSION_ABORTED: &str = "session.aborted";

/// The capture interval was reconfigured while running.
pub const EVENT_SESSION_INTERVAL_CHANGED: &str = "session.interval_changed";

/// One frame was analyzed and folded into session statistics.
pub const EVENT_FRAME_ANALYZED: &str = "frame.analyzed";

/// One frame was dropped (analysis failure or late arrival); not counted.
pub const EVENT_FRAME_DROPPED: &str = "frame.dropped";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
