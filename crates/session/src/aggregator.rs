//! Shared per-session aggregator handle (PRD-43).
//!
//! Wraps the pure `RunningStats` accumulator in a mutex so the
//! submission pipeline (ingest) and API handlers (snapshot) can touch it
//! concurrently. Both operations are short and synchronous; the lock is
//! never held across an await point.

use std::sync::{Mutex, MutexGuard};

use argus_core::stats::{FrameObservation, RunningStats, SessionCounters, SessionStatistics};

/// Result of offering a frame to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The frame was counted; carries the counters after ingestion.
    Accepted(SessionCounters),
    /// The session was already finalized; the frame must be dropped
    /// without persisting.
    DiscardedFinalized,
}

struct Inner {
    stats: RunningStats,
    finalized: bool,
}

/// Concurrent handle over one session's running statistics.
///
/// Finalization is folded into the same lock as ingestion, so a frame
/// arriving concurrently with `finalize` is either counted in the final
/// totals or discarded — never half-applied.
pub struct SessionAggregator {
    inner: Mutex<Inner>,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                stats: RunningStats::new(),
                finalized: false,
            }),
        }
    }

    /// Fold one analyzed frame into the running state.
    pub fn ingest(&self, frame: &FrameObservation) -> IngestOutcome {
        let mut inner = self.locked();
        if inner.finalized {
            return IngestOutcome::DiscardedFinalized;
        }
        inner.stats.ingest(frame);
        IngestOutcome::Accepted(inner.stats.counters())
    }

    /// Immutable statistics view; safe to call while frames keep arriving.
    pub fn snapshot(&self, elapsed: chrono::Duration) -> SessionStatistics {
        self.locked().stats.snapshot(elapsed)
    }

    /// Current counter triple.
    pub fn counters(&self) -> SessionCounters {
        self.locked().stats.counters()
    }

    /// Close the aggregator, returning the final counters exactly once.
    ///
    /// Subsequent calls return `None`, which lets a repeated stop skip
    /// re-finalizing the session row.
    pub fn finalize(&self) -> Option<SessionCounters> {
        let mut inner = self.locked();
        if inner.finalized {
            return None;
        }
        inner.finalized = true;
        Some(inner.stats.counters())
    }

    pub fn is_finalized(&self) -> bool {
        self.locked().finalized
    }

    /// The accumulator never panics while holding the lock, so a
    /// poisoned mutex still guards consistent state.
    fn locked(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for SessionAggregator {
    fn default() -> Self {
        Self::new()
    }
}
