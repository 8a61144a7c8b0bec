//! Top-level manager for all live inspection sessions (PRD-41).
//!
//! Owns one [`SessionRuntime`] + capture task per live session, the
//! shared collaborators (camera gateway, analyzer, store, event bus) and
//! the master cancellation token. Created once at startup and cloned
//! into request handlers.
//!
//! Finished sessions stay resident until shutdown: their aggregators
//! keep serving statistics snapshots, and a repeated stop finds the
//! entry and reports the terminal state idempotently. The API layer
//! falls back to the database for sessions from previous runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use argus_analyzer::DefectAnalyzer;
use argus_core::capture::{validate_capture_config, CaptureConfig};
use argus_core::error::CoreError;
use argus_core::event_names::EVENT_SESSION_STARTED;
use argus_core::lifecycle::SessionState;
use argus_core::report::SessionOverview;
use argus_core::stats::SessionStatistics;
use argus_core::types::DbId;
use argus_events::{EventBus, SessionEvent};

use crate::error::EngineError;
use crate::pipeline::SubmissionPipeline;
use crate::runtime::SessionRuntime;
use crate::scheduler::CaptureScheduler;
use crate::source::CameraGateway;
use crate::store::SessionStore;

/// Grace period for capture loops to exit during shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Bookkeeping for one live session.
struct SessionEntry {
    runtime: Arc<SessionRuntime>,
    task_handle: tokio::task::JoinHandle<()>,
}

/// Manages every live session in the process.
pub struct SessionManager {
    sessions: RwLock<HashMap<DbId, SessionEntry>>,
    camera: Arc<dyn CameraGateway>,
    analyzer: Arc<dyn DefectAnalyzer>,
    store: Arc<dyn SessionStore>,
    bus: Arc<EventBus>,
    /// Master cancellation token; every session token is a child.
    cancel: CancellationToken,
}

impl SessionManager {
    pub fn new(
        camera: Arc<dyn CameraGateway>,
        analyzer: Arc<dyn DefectAnalyzer>,
        store: Arc<dyn SessionStore>,
        bus: Arc<EventBus>,
    ) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            camera,
            analyzer,
            store,
            bus,
            cancel: CancellationToken::new(),
        })
    }

    /// Start a new session: validate, enforce source exclusivity, acquire
    /// the camera, persist the row, then spawn the capture loop.
    ///
    /// The device is acquired before anything is persisted, so a dead
    /// camera fails the start without leaving a session row behind.
    pub async fn start_session(
        &self,
        config: CaptureConfig,
        operator_id: Option<&str>,
    ) -> Result<SessionOverview, EngineError> {
        validate_capture_config(&config)?;

        // Exclusivity and acquisition happen under the write lock so two
        // concurrent starts cannot both grab the same camera.
        let mut sessions = self.sessions.write().await;
        for entry in sessions.values() {
            if entry.runtime.source_id() == config.source_id
                && !entry.runtime.state().await.is_terminal()
            {
                return Err(EngineError::DeviceBusy {
                    source_id: config.source_id.clone(),
                    session_id: entry.runtime.id(),
                });
            }
        }

        let camera = self.camera.acquire(&config.source_id).await?;

        let session_id = match self.store.create_session(operator_id, &config).await {
            Ok(id) => id,
            Err(e) => {
                camera.release().await;
                return Err(e.into());
            }
        };

        let runtime = SessionRuntime::new(
            session_id,
            &config,
            Arc::clone(&self.store),
            Arc::clone(&self.bus),
            self.cancel.child_token(),
        );
        let pipeline = SubmissionPipeline::new(Arc::clone(&runtime), Arc::clone(&self.analyzer));

        self.bus.publish(
            SessionEvent::new(EVENT_SESSION_STARTED)
                .with_session(session_id)
                .with_payload(json!({
                    "source_id": config.source_id,
                    "operator_id": operator_id,
                    "capture_interval_ms": config.interval_ms,
                    "auto_capture": config.auto_capture,
                })),
        );

        let scheduler = CaptureScheduler::new(Arc::clone(&runtime), pipeline);
        let task_handle = tokio::spawn(scheduler.run(camera));

        tracing::info!(
            session_id,
            source_id = %runtime.source_id(),
            interval_ms = config.interval_ms,
            "Inspection session started",
        );

        let overview = runtime.overview().await;
        sessions.insert(session_id, SessionEntry { runtime, task_handle });
        Ok(overview)
    }

    /// Pause a live session.
    pub async fn pause(&self, session_id: DbId) -> Result<SessionState, EngineError> {
        self.get(session_id).await?.pause().await
    }

    /// Resume a paused session.
    pub async fn resume(&self, session_id: DbId) -> Result<SessionState, EngineError> {
        self.get(session_id).await?.resume().await
    }

    /// Stop a live session (idempotent).
    pub async fn stop(&self, session_id: DbId) -> Result<SessionState, EngineError> {
        self.get(session_id).await?.stop().await
    }

    /// Abort a live session with a reason.
    pub async fn abort(&self, session_id: DbId, reason: &str) -> Result<SessionState, EngineError> {
        self.get(session_id).await?.abort(reason).await
    }

    /// Reconfigure the capture interval of a live session.
    pub async fn set_interval(
        &self,
        session_id: DbId,
        interval_ms: i64,
    ) -> Result<(), EngineError> {
        self.get(session_id).await?.set_interval(interval_ms).await
    }

    /// Live statistics snapshot from the session's aggregator.
    ///
    /// Fails `NotFound` for sessions not resident in this process; the
    /// API layer recomputes those from stored frames instead.
    pub async fn statistics(&self, session_id: DbId) -> Result<SessionStatistics, EngineError> {
        Ok(self.get(session_id).await?.statistics().await)
    }

    /// Live view of one session as the report builder sees it.
    pub async fn overview(&self, session_id: DbId) -> Result<SessionOverview, EngineError> {
        Ok(self.get(session_id).await?.overview().await)
    }

    /// Current lifecycle state of a live session.
    pub async fn state(&self, session_id: DbId) -> Result<SessionState, EngineError> {
        Ok(self.get(session_id).await?.state().await)
    }

    /// Abort every live session, then wait for the capture loops.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down session manager");

        let runtimes: Vec<Arc<SessionRuntime>> = {
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .map(|entry| Arc::clone(&entry.runtime))
                .collect()
        };
        for runtime in runtimes {
            if runtime.state().await.is_terminal() {
                continue;
            }
            if let Err(e) = runtime.abort("server shutdown").await {
                tracing::error!(
                    session_id = runtime.id(),
                    error = %e,
                    "Failed to abort session during shutdown",
                );
            }
        }

        self.cancel.cancel();

        let mut sessions = self.sessions.write().await;
        for (session_id, entry) in sessions.drain() {
            if tokio::time::timeout(SHUTDOWN_GRACE, entry.task_handle)
                .await
                .is_err()
            {
                tracing::warn!(session_id, "Capture loop did not exit within grace period");
            }
        }

        tracing::info!("Session manager shut down");
    }

    // ---- private helpers ----

    async fn get(&self, session_id: DbId) -> Result<Arc<SessionRuntime>, EngineError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|entry| Arc::clone(&entry.runtime))
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "session",
                    id: session_id,
                }
                .into()
            })
    }
}
