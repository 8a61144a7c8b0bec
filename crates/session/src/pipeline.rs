//! One-in-flight submission pipeline (PRD-42).
//!
//! Takes a captured frame, runs it through the analyzer, and routes the
//! validated result into the aggregator and the store. The busy flag
//! enforces at-most-one outstanding analysis per session; the scheduler
//! checks it before capturing, and [`SubmissionPipeline::submit`]
//! defends independently for callers that do not.
//!
//! Failed frames are dropped, never retried: a `frame.dropped` event is
//! the only trace, and the session keeps running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;

use argus_analyzer::DefectAnalyzer;
use argus_core::event_names::{EVENT_FRAME_ANALYZED, EVENT_FRAME_DROPPED};
use argus_events::SessionEvent;

use crate::aggregator::IngestOutcome;
use crate::error::EngineError;
use crate::runtime::SessionRuntime;
use crate::source::RawFrame;

/// Per-session submission pipeline.
pub struct SubmissionPipeline {
    runtime: Arc<SessionRuntime>,
    analyzer: Arc<dyn DefectAnalyzer>,
    busy: AtomicBool,
}

impl SubmissionPipeline {
    pub fn new(runtime: Arc<SessionRuntime>, analyzer: Arc<dyn DefectAnalyzer>) -> Arc<Self> {
        Arc::new(Self {
            runtime,
            analyzer,
            busy: AtomicBool::new(false),
        })
    }

    /// Whether a submission is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the pipeline and process the frame on a detached task.
    ///
    /// Returns immediately: the scheduler must stay free to observe its
    /// next tick while analysis runs. Fails with
    /// [`EngineError::AlreadyInFlight`] if the previous submission has
    /// not resolved.
    pub fn submit(self: &Arc<Self>, frame: RawFrame) -> Result<(), EngineError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EngineError::AlreadyInFlight);
        }

        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            pipeline.process(frame).await;
            pipeline.busy.store(false, Ordering::Release);
        });
        Ok(())
    }

    /// Analyze one frame and route the outcome.
    async fn process(&self, frame: RawFrame) {
        let session_id = self.runtime.id();
        let captured_at = frame.captured_at;

        let verdict = match self.analyzer.analyze(frame.image).await {
            Ok(verdict) => verdict,
            Err(e) => {
                self.drop_frame(&e.to_string());
                return;
            }
        };

        let observation = match verdict.into_observation(captured_at) {
            Ok(observation) => observation,
            Err(e) => {
                self.drop_frame(&e.to_string());
                return;
            }
        };

        // Count first: the aggregator is authoritative while the session
        // runs, and a finalized aggregator means the frame arrived too late.
        let counters = match self.runtime.aggregator().ingest(&observation) {
            IngestOutcome::Accepted(counters) => counters,
            IngestOutcome::DiscardedFinalized => {
                tracing::debug!(session_id, "Late frame discarded after finalization");
                return;
            }
        };

        // A failed write costs durability of this frame, not its count.
        if let Err(e) = self
            .runtime
            .store()
            .append_frame(session_id, &observation)
            .await
        {
            tracing::error!(session_id, error = %e, "Failed to persist frame");
        }
        if let Err(e) = self
            .runtime
            .store()
            .update_counters(session_id, counters)
            .await
        {
            tracing::error!(session_id, error = %e, "Failed to persist counters");
        }

        self.runtime.bus().publish(
            SessionEvent::new(EVENT_FRAME_ANALYZED)
                .with_session(session_id)
                .with_payload(json!({
                    "is_defect": observation.is_defect,
                    "anomaly_score": observation.anomaly_score,
                    "defect_count": observation.defects.len(),
                    "total_frames": counters.total_frames,
                })),
        );
        tracing::debug!(
            session_id,
            is_defect = observation.is_defect,
            anomaly_score = observation.anomaly_score,
            "Frame analyzed",
        );
    }

    /// Emit the drop event for a frame that failed analysis or validation.
    fn drop_frame(&self, reason: &str) {
        let session_id = self.runtime.id();
        tracing::warn!(session_id, reason, "Frame dropped");
        self.runtime.bus().publish(
            SessionEvent::new(EVENT_FRAME_DROPPED)
                .with_session(session_id)
                .with_payload(json!({ "reason": reason })),
        );
    }
}
