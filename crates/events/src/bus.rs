//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`SessionEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application:
//! the session engine publishes, while the WebSocket fan-out and the
//! [`EventJournal`](crate::journal::EventJournal) subscribe.

use argus_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// A domain event emitted by the inspection engine.
///
/// Constructed via [`SessionEvent::new`] and enriched with
/// [`with_session`](SessionEvent::with_session) and
/// [`with_payload`](SessionEvent::with_payload). Event type strings come
/// from `argus_core::event_names`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Dot-separated event name, e.g. `"session.started"`.
    pub event_type: String,

    /// The session this event belongs to, when applicable.
    pub session_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: Timestamp,
}

impl SessionEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            session_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the owning session.
    pub fn with_session(mut self, session_id: DbId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`SessionEvent`].
pub struct EventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    /// The journal (when subscribed) ensures database capture.
    pub fn publish(&self, event: SessionEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use argus_core::event_names::{EVENT_FRAME_ANALYZED, EVENT_SESSION_STARTED};

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = SessionEvent::new(EVENT_SESSION_STARTED)
            .with_session(42)
            .with_payload(serde_json::json!({"source_id": "http://cam-1/snapshot"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, EVENT_SESSION_STARTED);
        assert_eq!(received.session_id, Some(42));
        assert_eq!(received.payload["source_id"], "http://cam-1/snapshot");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(SessionEvent::new(EVENT_FRAME_ANALYZED).with_session(7));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, EVENT_FRAME_ANALYZED);
        assert_eq!(e2.session_id, Some(7));
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(SessionEvent::new("orphan.event"));
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = SessionEvent::new("bare.event");
        assert_eq!(event.event_type, "bare.event");
        assert!(event.session_id.is_none());
        assert!(event.payload.is_object());
    }
}
