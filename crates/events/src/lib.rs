//! Argus session event infrastructure (PRD-44).
//!
//! Building blocks for the in-process event stream:
//!
//! - [`EventBus`] — publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`SessionEvent`] — the canonical event envelope for session lifecycle
//!   and per-frame events.
//! - [`EventJournal`] — background service that durably writes every event
//!   to the `session_events` table.

pub mod bus;
pub mod journal;

pub use bus::{EventBus, SessionEvent};
pub use journal::EventJournal;
