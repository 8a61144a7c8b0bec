//! Session lifecycle state machine (PRD-41).
//!
//! The machine is deliberately small and total: every `(state, action)` pair
//! either yields a new state or a [`CoreError::Conflict`]. The runtime layer
//! in `argus-session` applies these transitions under a lock and performs the
//! side effects (device acquire/release, persistence, events); nothing here
//! touches the outside world.
//!
//! ```text
//!            start            pause
//!   Idle ───────────▶ Active ◀──────▶ Paused
//!                       │     resume    │
//!                       │ stop          │ stop
//!                       ▼               ▼
//!                    Stopped         Stopped
//!
//!   abort(reason): any non-terminal state ──▶ Aborted
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status column values
// ---------------------------------------------------------------------------

/// `inspection_sessions.status` value while capture is running.
pub const STATUS_ACTIVE: &str = "active";
/// `inspection_sessions.status` value while capture is suspended.
pub const STATUS_PAUSED: &str = "paused";
/// `inspection_sessions.status` value after a normal stop.
pub const STATUS_COMPLETED: &str = "completed";
/// `inspection_sessions.status` value after an abort.
pub const STATUS_ABORTED: &str = "aborted";

// ---------------------------------------------------------------------------
// States and actions
// ---------------------------------------------------------------------------

/// Lifecycle state of one inspection session.
///
/// `Idle` exists only before a successful `start()`: no session row is
/// persisted for it, which is why [`SessionState::status_str`] has no value
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No capture device held; nothing persisted yet.
    Idle,
    /// Device acquired, scheduler may fire.
    Active,
    /// Device acquired, scheduler must not fire.
    Paused,
    /// Terminal: stopped normally, device released.
    Stopped,
    /// Terminal: aborted with a reason, device released.
    Aborted,
}

impl SessionState {
    /// Terminal states accept no further transitions except idempotent stop.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Aborted)
    }

    /// Only `Active` sessions may capture frames.
    pub fn may_capture(self) -> bool {
        matches!(self, Self::Active)
    }

    /// States in which the capture device handle is held.
    pub fn holds_device(self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    /// Lowercase label for log messages and errors.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Aborted => "aborted",
        }
    }

    /// The `status` column value for this state, or `None` for `Idle`
    /// (idle sessions are never persisted).
    pub fn status_str(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Active => Some(STATUS_ACTIVE),
            Self::Paused => Some(STATUS_PAUSED),
            Self::Stopped => Some(STATUS_COMPLETED),
            Self::Aborted => Some(STATUS_ABORTED),
        }
    }

    /// Parse a persisted `status` column value back into a state.
    pub fn from_status_str(status: &str) -> Option<Self> {
        match status {
            STATUS_ACTIVE => Some(Self::Active),
            STATUS_PAUSED => Some(Self::Paused),
            STATUS_COMPLETED => Some(Self::Stopped),
            STATUS_ABORTED => Some(Self::Aborted),
            _ => None,
        }
    }
}

/// A lifecycle action requested by the operator or by the engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    Stop,
    Abort,
}

impl SessionAction {
    /// Lowercase verb for error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::Abort => "abort",
        }
    }
}

// ---------------------------------------------------------------------------
// Transition function
// ---------------------------------------------------------------------------

/// Apply one lifecycle action to a state.
///
/// Rules:
/// - `Start` is valid only from `Idle`.
/// - `Pause` is valid only from `Active`; `Resume` only from `Paused`.
/// - `Stop` from `Active` or `Paused` yields `Stopped`; from a terminal
///   state it is an idempotent no-op that returns the current state
///   unchanged (stopping twice must not double-finalize).
/// - `Abort` from any non-terminal state yields `Aborted`; aborting a
///   terminal session is a conflict.
pub fn transition(state: SessionState, action: SessionAction) -> Result<SessionState, CoreError> {
    use SessionAction as A;
    use SessionState as S;

    match (state, action) {
        (S::Idle, A::Start) => Ok(S::Active),
        (S::Active, A::Pause) => Ok(S::Paused),
        (S::Paused, A::Resume) => Ok(S::Active),
        (S::Active | S::Paused, A::Stop) => Ok(S::Stopped),
        (s, A::Stop) if s.is_terminal() => Ok(s),
        (s, A::Abort) if !s.is_terminal() => Ok(S::Aborted),
        (s, a) => Err(CoreError::Conflict(format!(
            "cannot {} a session in state '{}'",
            a.label(),
            s.label()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
