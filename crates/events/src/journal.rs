//! Durable event journaling service.
//!
//! [`EventJournal`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes every received [`SessionEvent`] to the
//! `session_events` table. It runs as a long-lived background task and shuts
//! down gracefully when the bus sender is dropped.

use argus_db::repositories::EventRepo;
use argus_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::SessionEvent;

/// Background service that persists session events to the database.
pub struct EventJournal;

impl EventJournal {
    /// Run the journaling loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and persists
    /// every event it receives. A failed write is logged and skipped; the
    /// loop never crashes the process. The loop exits when the channel is
    /// closed (i.e. the [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<SessionEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let result = EventRepo::insert(
                        &pool,
                        &event.event_type,
                        event.session_id,
                        &event.payload,
                        event.timestamp,
                    )
                    .await;
                    if let Err(e) = result {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to journal event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event journal lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, journal shutting down");
                    break;
                }
            }
        }
    }
}
