//! Per-session lifecycle controller (PRD-41).
//!
//! [`SessionRuntime`] is the live context behind one session: the state
//! machine cell, the aggregator, the interval channel feeding the
//! scheduler, and the cancellation token that stops it. Transitions
//! apply the pure `argus_core::lifecycle::transition` function under a
//! write lock, then perform persistence and event side effects while
//! still holding it, so concurrent user actions serialize cleanly.
//!
//! Terminal transitions fire the cancellation token before returning:
//! once `stop` or `abort` resolves, no further tick can initiate a
//! capture.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;

use argus_core::capture::{validate_capture_interval, CaptureConfig};
use argus_core::error::CoreError;
use argus_core::event_names::{
    EVENT_SESSION_ABORTED, EVENT_SESSION_INTERVAL_CHANGED, EVENT_SESSION_PAUSED,
    EVENT_SESSION_RESUMED, EVENT_SESSION_STOPPED,
};
use argus_core::lifecycle::{transition, SessionAction, SessionState, STATUS_ACTIVE, STATUS_PAUSED};
use argus_core::report::SessionOverview;
use argus_core::stats::{SessionCounters, SessionStatistics};
use argus_core::types::{DbId, Timestamp};
use argus_events::{EventBus, SessionEvent};

use crate::aggregator::SessionAggregator;
use crate::error::EngineError;
use crate::store::{SessionOutcome, SessionStore};

struct Lifecycle {
    state: SessionState,
    ended_at: Option<Timestamp>,
    abort_reason: Option<String>,
}

/// Live context for one running (or just-finished) session.
pub struct SessionRuntime {
    id: DbId,
    source_id: String,
    auto_capture: bool,
    started_at: Timestamp,
    lifecycle: RwLock<Lifecycle>,
    aggregator: SessionAggregator,
    interval_tx: watch::Sender<Duration>,
    cancel: CancellationToken,
    store: Arc<dyn SessionStore>,
    bus: Arc<EventBus>,
}

impl SessionRuntime {
    /// Build the runtime for a session that has just acquired its device
    /// and been persisted. Starts in `Active`.
    pub(crate) fn new(
        id: DbId,
        config: &CaptureConfig,
        store: Arc<dyn SessionStore>,
        bus: Arc<EventBus>,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        let (interval_tx, _) = watch::channel(config.interval());
        Arc::new(Self {
            id,
            source_id: config.source_id.clone(),
            auto_capture: config.auto_capture,
            started_at: Utc::now(),
            lifecycle: RwLock::new(Lifecycle {
                state: SessionState::Active,
                ended_at: None,
                abort_reason: None,
            }),
            aggregator: SessionAggregator::new(),
            interval_tx,
            cancel,
            store,
            bus,
        })
    }

    // ---- accessors ----

    pub fn id(&self) -> DbId {
        self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn auto_capture(&self) -> bool {
        self.auto_capture
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn aggregator(&self) -> &SessionAggregator {
        &self.aggregator
    }

    /// Token cancelled by terminal transitions (and manager shutdown).
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Receiver side of the live capture-interval channel.
    pub fn interval_rx(&self) -> watch::Receiver<Duration> {
        self.interval_tx.subscribe()
    }

    /// Currently configured capture interval in milliseconds.
    pub fn capture_interval_ms(&self) -> i64 {
        self.interval_tx.borrow().as_millis() as i64
    }

    pub(crate) fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub(crate) fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub async fn state(&self) -> SessionState {
        self.lifecycle.read().await.state
    }

    /// Whether the scheduler may capture right now (`Active` only).
    pub async fn may_capture(&self) -> bool {
        self.lifecycle.read().await.state.may_capture()
    }

    /// Projection of this session as the report builder sees it.
    pub async fn overview(&self) -> SessionOverview {
        let cell = self.lifecycle.read().await;
        SessionOverview {
            id: self.id,
            status: cell.state.status_str().unwrap_or(STATUS_ACTIVE).to_string(),
            source_id: self.source_id.clone(),
            capture_interval_ms: self.capture_interval_ms(),
            started_at: self.started_at,
            ended_at: cell.ended_at,
            abort_reason: cell.abort_reason.clone(),
        }
    }

    /// Statistics snapshot; elapsed time is frozen at `ended_at` once the
    /// session is terminal.
    pub async fn statistics(&self) -> SessionStatistics {
        let end = {
            let cell = self.lifecycle.read().await;
            cell.ended_at.unwrap_or_else(Utc::now)
        };
        self.aggregator.snapshot(end - self.started_at)
    }

    // ---- transitions ----

    /// Active → Paused. The device stays acquired; ticks are suppressed
    /// until resume.
    pub async fn pause(&self) -> Result<SessionState, EngineError> {
        let mut cell = self.lifecycle.write().await;
        let next = transition(cell.state, SessionAction::Pause)?;
        self.store.update_status(self.id, STATUS_PAUSED).await?;
        cell.state = next;
        self.bus
            .publish(SessionEvent::new(EVENT_SESSION_PAUSED).with_session(self.id));
        tracing::info!(session_id = self.id, "Session paused");
        Ok(next)
    }

    /// Paused → Active.
    pub async fn resume(&self) -> Result<SessionState, EngineError> {
        let mut cell = self.lifecycle.write().await;
        let next = transition(cell.state, SessionAction::Resume)?;
        self.store.update_status(self.id, STATUS_ACTIVE).await?;
        cell.state = next;
        self.bus
            .publish(SessionEvent::new(EVENT_SESSION_RESUMED).with_session(self.id));
        tracing::info!(session_id = self.id, "Session resumed");
        Ok(next)
    }

    /// Active | Paused → Stopped. Idempotent: a session already terminal
    /// reports its state and does nothing else.
    pub async fn stop(&self) -> Result<SessionState, EngineError> {
        let mut cell = self.lifecycle.write().await;
        if cell.state.is_terminal() {
            return Ok(cell.state);
        }
        let next = transition(cell.state, SessionAction::Stop)?;

        let ended_at = Utc::now();
        cell.state = next;
        cell.ended_at = Some(ended_at);
        self.cancel.cancel();

        let counters = self.final_counters();
        let persisted = self
            .store
            .finalize(self.id, SessionOutcome::Completed, ended_at, counters, None)
            .await;

        self.bus.publish(
            SessionEvent::new(EVENT_SESSION_STOPPED)
                .with_session(self.id)
                .with_payload(counters_payload(counters)),
        );
        tracing::info!(
            session_id = self.id,
            total_frames = counters.total_frames,
            defect_frames = counters.defect_frames,
            "Session stopped",
        );

        if let Err(e) = &persisted {
            tracing::error!(session_id = self.id, error = %e, "Failed to persist session stop");
        }
        persisted?;
        Ok(next)
    }

    /// Any non-terminal state → Aborted, with a reason string.
    pub async fn abort(&self, reason: &str) -> Result<SessionState, EngineError> {
        let mut cell = self.lifecycle.write().await;
        let next = transition(cell.state, SessionAction::Abort)?;

        let ended_at = Utc::now();
        cell.state = next;
        cell.ended_at = Some(ended_at);
        cell.abort_reason = Some(reason.to_string());
        self.cancel.cancel();

        let counters = self.final_counters();
        let persisted = self
            .store
            .finalize(
                self.id,
                SessionOutcome::Aborted,
                ended_at,
                counters,
                Some(reason),
            )
            .await;

        self.bus.publish(
            SessionEvent::new(EVENT_SESSION_ABORTED)
                .with_session(self.id)
                .with_payload(json!({
                    "reason": reason,
                    "total_frames": counters.total_frames,
                    "good_frames": counters.good_frames,
                    "defect_frames": counters.defect_frames,
                })),
        );
        tracing::warn!(session_id = self.id, reason, "Session aborted");

        if let Err(e) = &persisted {
            tracing::error!(session_id = self.id, error = %e, "Failed to persist session abort");
        }
        persisted?;
        Ok(next)
    }

    /// Reconfigure the capture interval of a live session. The scheduler
    /// restarts its timer with the new period; the capture in flight, if
    /// any, is unaffected.
    pub async fn set_interval(&self, interval_ms: i64) -> Result<(), EngineError> {
        validate_capture_interval(interval_ms)?;

        let cell = self.lifecycle.read().await;
        if cell.state.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "cannot reconfigure a session in state '{}'",
                cell.state.label()
            ))
            .into());
        }

        self.store.update_interval(self.id, interval_ms).await?;
        let _ = self
            .interval_tx
            .send(Duration::from_millis(interval_ms as u64));

        self.bus.publish(
            SessionEvent::new(EVENT_SESSION_INTERVAL_CHANGED)
                .with_session(self.id)
                .with_payload(json!({ "capture_interval_ms": interval_ms })),
        );
        tracing::info!(session_id = self.id, interval_ms, "Capture interval changed");
        Ok(())
    }

    // ---- private helpers ----

    /// Close the aggregator and read the final counters. Terminal
    /// transitions are serialized by the lifecycle lock, so the aggregator
    /// can only already be finalized if a racing caller won; its counters
    /// are final either way.
    fn final_counters(&self) -> SessionCounters {
        match self.aggregator.finalize() {
            Some(counters) => counters,
            None => self.aggregator.counters(),
        }
    }
}

fn counters_payload(counters: SessionCounters) -> serde_json::Value {
    json!({
        "total_frames": counters.total_frames,
        "good_frames": counters.good_frames,
        "defect_frames": counters.defect_frames,
    })
}
