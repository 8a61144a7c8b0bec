//! Periodic capture loop (PRD-41).
//!
//! One tokio task per session. Each tick is a capture *attempt*: it
//! fires only while the session is `Active` and the pipeline is free,
//! and is otherwise skipped silently — ticks are never queued, so slow
//! analysis degrades the effective frame rate instead of building a
//! backlog.
//!
//! The loop owns the camera handle for the life of the session and
//! releases it on exit, whatever caused the exit.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::pipeline::SubmissionPipeline;
use crate::runtime::SessionRuntime;
use crate::source::FrameSource;

/// The per-session capture loop.
pub struct CaptureScheduler {
    runtime: Arc<SessionRuntime>,
    pipeline: Arc<SubmissionPipeline>,
}

impl CaptureScheduler {
    pub fn new(runtime: Arc<SessionRuntime>, pipeline: Arc<SubmissionPipeline>) -> Self {
        Self { runtime, pipeline }
    }

    /// Run until the session reaches a terminal state.
    ///
    /// Reacts to three things: the cancellation token (biased, so
    /// cancellation wins over a due tick), live interval changes (the
    /// timer restarts with the new period), and the tick itself. With
    /// `auto_capture` off the loop just holds the camera until
    /// cancellation.
    pub async fn run(self, mut camera: Box<dyn FrameSource>) {
        let session_id = self.runtime.id();
        let cancel = self.runtime.cancel_token();
        let auto_capture = self.runtime.auto_capture();
        let mut interval_rx = self.runtime.interval_rx();
        let mut period = *interval_rx.borrow();
        let mut ticker = make_ticker(period);

        tracing::info!(
            session_id,
            period_ms = period.as_millis() as u64,
            auto_capture,
            "Capture loop started",
        );

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    period = *interval_rx.borrow_and_update();
                    ticker = make_ticker(period);
                    tracing::debug!(
                        session_id,
                        period_ms = period.as_millis() as u64,
                        "Capture timer restarted",
                    );
                }

                _ = ticker.tick(), if auto_capture => {
                    if !self.on_tick(&mut camera).await {
                        break;
                    }
                }
            }
        }

        camera.release().await;
        tracing::info!(session_id, "Capture loop stopped");
    }

    /// One capture attempt. Returns `false` when the loop must exit
    /// (device failure aborted the session).
    async fn on_tick(&self, camera: &mut Box<dyn FrameSource>) -> bool {
        let session_id = self.runtime.id();

        if !self.runtime.may_capture().await {
            return true;
        }
        if self.pipeline.is_busy() {
            tracing::debug!(session_id, "Tick skipped, submission in flight");
            return true;
        }

        match camera.capture_frame().await {
            Ok(frame) => {
                if let Err(e) = self.pipeline.submit(frame) {
                    // Lost a race to another submitter; same as a busy tick.
                    tracing::debug!(session_id, error = %e, "Tick skipped");
                }
                true
            }
            Err(e) => {
                tracing::error!(session_id, error = %e, "Frame capture failed");
                let reason = format!("device failure: {e}");
                if let Err(abort_err) = self.runtime.abort(&reason).await {
                    // A concurrent stop already made the session terminal.
                    tracing::debug!(session_id, error = %abort_err, "Abort superseded");
                }
                false
            }
        }
    }
}

fn make_ticker(period: Duration) -> Interval {
    // First tick one full period after (re)start, later ticks on the
    // period grid; ticks that fall due while the task is busy elsewhere
    // are skipped, not bursted.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
