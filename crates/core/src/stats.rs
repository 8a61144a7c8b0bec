//! Streaming per-session statistics (PRD-43).
//!
//! [`RunningStats`] is the pure accumulator behind the session aggregator:
//! every update is O(1) (running counts and online means, never a recompute
//! over frame history), except the label/severity maps which grow with the
//! number of distinct categories. The shared concurrent handle lives in
//! `argus-session`; this module owns only the math.
//!
//! Counting is order-independent: ingesting the same frames in any order
//! yields identical counters and distributions. Time bucketing always uses
//! each frame's own captured-at (UTC), never arrival time.

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::numeric::{round_ms, round_score, round_to, safe_pct};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Frame-level types
// ---------------------------------------------------------------------------

/// Relative bounding box of a defect within the frame (0..1 coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One defect finding within a frame. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectFinding {
    /// Defect category, e.g. `"scratch"`, `"dent"`.
    pub label: String,
    /// Detector confidence in 0..1.
    pub confidence: f64,
    /// One of the well-known severities (`crate::severity`).
    pub severity: String,
    /// Affected area as a percentage of the frame, 0..100.
    pub area_pct: f64,
    pub bounding_box: Option<BoundingBox>,
}

/// Per-stage processing durations for one frame, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimings {
    pub preprocess_ms: f64,
    pub anomaly_ms: f64,
    pub classify_ms: f64,
    pub postprocess_ms: f64,
}

impl StageTimings {
    /// Sum of all four stages.
    pub fn total_ms(&self) -> f64 {
        self.preprocess_ms + self.anomaly_ms + self.classify_ms + self.postprocess_ms
    }
}

/// One analyzed frame as consumed by aggregation and reporting.
///
/// Built by the submission pipeline from an analysis verdict, or
/// reconstructed from `frames` + `defect_findings` rows when statistics are
/// recomputed for a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameObservation {
    pub captured_at: Timestamp,
    pub is_defect: bool,
    /// Anomaly score in 0..1.
    pub anomaly_score: f64,
    pub timings: StageTimings,
    pub defects: Vec<DefectFinding>,
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// The three persisted session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCounters {
    pub total_frames: i64,
    pub good_frames: i64,
    pub defect_frames: i64,
}

// ---------------------------------------------------------------------------
// Incremental mean
// ---------------------------------------------------------------------------

/// Compute the incremental (online) mean after observing a new value.
///
/// Formula: `new_avg = old_avg + (new_value - old_avg) / new_count`
pub fn incremental_mean(old_avg: f64, new_value: f64, new_count: i64) -> f64 {
    old_avg + (new_value - old_avg) / new_count as f64
}

// ---------------------------------------------------------------------------
// RunningStats
// ---------------------------------------------------------------------------

/// Order-independent streaming accumulator for one session.
///
/// Fields are private: the only way to mutate is [`RunningStats::ingest`],
/// which keeps the counters, means, and distributions consistent with each
/// other.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    total_frames: i64,
    good_frames: i64,
    defect_frames: i64,
    anomaly_avg: f64,
    anomaly_min: Option<f64>,
    anomaly_max: Option<f64>,
    stage_avg: StageTimings,
    label_counts: BTreeMap<String, i64>,
    severity_counts: BTreeMap<String, i64>,
    hour_counts: [i64; 24],
    first_captured_at: Option<Timestamp>,
    last_captured_at: Option<Timestamp>,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame into the running state. O(1) amortized.
    pub fn ingest(&mut self, frame: &FrameObservation) {
        self.total_frames += 1;
        if frame.is_defect {
            self.defect_frames += 1;
        } else {
            self.good_frames += 1;
        }

        let n = self.total_frames;
        self.anomaly_avg = incremental_mean(self.anomaly_avg, frame.anomaly_score, n);
        self.anomaly_min = Some(match self.anomaly_min {
            Some(min) => min.min(frame.anomaly_score),
            None => frame.anomaly_score,
        });
        self.anomaly_max = Some(match self.anomaly_max {
            Some(max) => max.max(frame.anomaly_score),
            None => frame.anomaly_score,
        });

        self.stage_avg = StageTimings {
            preprocess_ms: incremental_mean(
                self.stage_avg.preprocess_ms,
                frame.timings.preprocess_ms,
                n,
            ),
            anomaly_ms: incremental_mean(self.stage_avg.anomaly_ms, frame.timings.anomaly_ms, n),
            classify_ms: incremental_mean(
                self.stage_avg.classify_ms,
                frame.timings.classify_ms,
                n,
            ),
            postprocess_ms: incremental_mean(
                self.stage_avg.postprocess_ms,
                frame.timings.postprocess_ms,
                n,
            ),
        };

        for defect in &frame.defects {
            *self.label_counts.entry(defect.label.clone()).or_insert(0) += 1;
            *self
                .severity_counts
                .entry(defect.severity.clone())
                .or_insert(0) += 1;
        }

        self.hour_counts[frame.captured_at.hour() as usize] += 1;

        // Min/max by captured-at, so arrival order does not matter.
        self.first_captured_at = Some(match self.first_captured_at {
            Some(first) => first.min(frame.captured_at),
            None => frame.captured_at,
        });
        self.last_captured_at = Some(match self.last_captured_at {
            Some(last) => last.max(frame.captured_at),
            None => frame.captured_at,
        });
    }

    /// The persisted counter triple.
    pub fn counters(&self) -> SessionCounters {
        SessionCounters {
            total_frames: self.total_frames,
            good_frames: self.good_frames,
            defect_frames: self.defect_frames,
        }
    }

    pub fn total_frames(&self) -> i64 {
        self.total_frames
    }

    /// Immutable statistics view over the running state.
    ///
    /// `elapsed` is the session duration as known to the caller (now minus
    /// start for a live session, final duration otherwise); it only feeds the
    /// throughput figure, keeping this computation free of wall-clock reads.
    pub fn snapshot(&self, elapsed: chrono::Duration) -> SessionStatistics {
        let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
        let frames_per_minute = if minutes > 0.0 {
            round_to(self.total_frames as f64 / minutes, 2)
        } else {
            0.0
        };

        SessionStatistics {
            total_frames: self.total_frames,
            good_frames: self.good_frames,
            defect_frames: self.defect_frames,
            defect_rate_pct: safe_pct(self.defect_frames, self.total_frames),
            anomaly_min: self.anomaly_min.map(round_score),
            anomaly_max: self.anomaly_max.map(round_score),
            anomaly_avg: (self.total_frames > 0).then(|| round_score(self.anomaly_avg)),
            frames_per_minute,
            stage_avg_ms: StageTimings {
                preprocess_ms: round_ms(self.stage_avg.preprocess_ms),
                anomaly_ms: round_ms(self.stage_avg.anomaly_ms),
                classify_ms: round_ms(self.stage_avg.classify_ms),
                postprocess_ms: round_ms(self.stage_avg.postprocess_ms),
            },
            label_counts: self.label_counts.clone(),
            severity_counts: self.severity_counts.clone(),
            hourly_counts: self
                .hour_counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(hour, count)| HourCount {
                    hour: hour as u8,
                    frames: *count,
                })
                .collect(),
            first_captured_at: self.first_captured_at,
            last_captured_at: self.last_captured_at,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatistics
// ---------------------------------------------------------------------------

/// Frame count for one UTC hour of day (0..=23). Hours with zero frames are
/// omitted from [`SessionStatistics::hourly_counts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCount {
    pub hour: u8,
    pub frames: i64,
}

/// Point-in-time statistics for one session.
///
/// Derived entirely from Session + Frame + Defect data; serving code must be
/// able to recompute an identical value from persisted rows.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatistics {
    pub total_frames: i64,
    pub good_frames: i64,
    pub defect_frames: i64,
    /// `100 * defect / total`, one decimal place; 0 for an empty session.
    pub defect_rate_pct: f64,
    pub anomaly_min: Option<f64>,
    pub anomaly_max: Option<f64>,
    pub anomaly_avg: Option<f64>,
    pub frames_per_minute: f64,
    pub stage_avg_ms: StageTimings,
    /// Defect finding count per label.
    pub label_counts: BTreeMap<String, i64>,
    /// Defect finding count per severity.
    pub severity_counts: BTreeMap<String, i64>,
    pub hourly_counts: Vec<HourCount>,
    pub first_captured_at: Option<Timestamp>,
    pub last_captured_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, min, 0).unwrap()
    }

    fn good_frame(hour: u32, min: u32, score: f64) -> FrameObservation {
        FrameObservation {
            captured_at: at(hour, min),
            is_defect: false,
            anomaly_score: score,
            timings: StageTimings {
                preprocess_ms: 10.0,
                anomaly_ms: 40.0,
                classify_ms: 25.0,
                postprocess_ms: 5.0,
            },
            defects: vec![],
        }
    }

    fn defect_frame(hour: u32, min: u32, score: f64, label: &str, severity: &str) -> FrameObservation {
        FrameObservation {
            is_defect: true,
            defects: vec![DefectFinding {
                label: label.to_string(),
                confidence: 0.9,
                severity: severity.to_string(),
                area_pct: 2.5,
                bounding_box: None,
            }],
            ..good_frame(hour, min, score)
        }
    }

    // -- incremental_mean --

    #[test]
    fn incremental_mean_first_sample() {
        let result = incremental_mean(0.0, 10.0, 1);
        assert!((result - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn incremental_mean_three_values() {
        // 10, 20, 30 -> mean 20.
        let avg1 = incremental_mean(0.0, 10.0, 1);
        let avg2 = incremental_mean(avg1, 20.0, 2);
        let avg3 = incremental_mean(avg2, 30.0, 3);
        assert!((avg3 - 20.0).abs() < 1e-9);
    }

    // -- ingest counters --

    #[test]
    fn empty_stats_snapshot_is_all_zero() {
        let stats = RunningStats::new();
        let snap = stats.snapshot(chrono::Duration::zero());
        assert_eq!(snap.total_frames, 0);
        assert_eq!(snap.defect_rate_pct, 0.0);
        assert_eq!(snap.anomaly_avg, None);
        assert_eq!(snap.anomaly_min, None);
        assert_eq!(snap.frames_per_minute, 0.0);
        assert!(snap.label_counts.is_empty());
        assert!(snap.hourly_counts.is_empty());
    }

    #[test]
    fn counts_split_good_and_defective() {
        let mut stats = RunningStats::new();
        stats.ingest(&defect_frame(9, 0, 0.8, "scratch", "major"));
        stats.ingest(&good_frame(9, 1, 0.1));
        stats.ingest(&defect_frame(9, 2, 0.9, "scratch", "critical"));

        let counters = stats.counters();
        assert_eq!(counters.total_frames, 3);
        assert_eq!(counters.good_frames, 1);
        assert_eq!(counters.defect_frames, 2);

        let snap = stats.snapshot(chrono::Duration::minutes(1));
        assert_eq!(snap.defect_rate_pct, 66.7);
        assert_eq!(snap.label_counts.get("scratch"), Some(&2));
        assert_eq!(snap.severity_counts.get("critical"), Some(&1));
        assert_eq!(snap.severity_counts.get("major"), Some(&1));
    }

    // -- streaming anomaly stats --

    #[test]
    fn anomaly_min_max_avg_track_scores() {
        let mut stats = RunningStats::new();
        stats.ingest(&good_frame(9, 0, 0.2));
        stats.ingest(&good_frame(9, 1, 0.6));
        stats.ingest(&good_frame(9, 2, 0.1));

        let snap = stats.snapshot(chrono::Duration::minutes(1));
        assert_eq!(snap.anomaly_min, Some(0.1));
        assert_eq!(snap.anomaly_max, Some(0.6));
        assert_eq!(snap.anomaly_avg, Some(0.3));
    }

    #[test]
    fn stage_averages_are_running_means() {
        let mut stats = RunningStats::new();
        let mut fast = good_frame(9, 0, 0.1);
        fast.timings.anomaly_ms = 30.0;
        let mut slow = good_frame(9, 1, 0.1);
        slow.timings.anomaly_ms = 50.0;

        stats.ingest(&fast);
        stats.ingest(&slow);

        let snap = stats.snapshot(chrono::Duration::minutes(1));
        assert_eq!(snap.stage_avg_ms.anomaly_ms, 40.0);
        assert_eq!(snap.stage_avg_ms.preprocess_ms, 10.0);
    }

    // -- order independence --

    #[test]
    fn ingest_order_does_not_change_counts_or_distributions() {
        let frames = vec![
            defect_frame(8, 0, 0.9, "scratch", "major"),
            good_frame(9, 0, 0.2),
            defect_frame(10, 0, 0.7, "dent", "minor"),
            defect_frame(11, 0, 0.95, "scratch", "critical"),
        ];

        let mut forward = RunningStats::new();
        for f in &frames {
            forward.ingest(f);
        }
        let mut reverse = RunningStats::new();
        for f in frames.iter().rev() {
            reverse.ingest(f);
        }

        assert_eq!(forward.counters(), reverse.counters());
        let a = forward.snapshot(chrono::Duration::minutes(5));
        let b = reverse.snapshot(chrono::Duration::minutes(5));
        assert_eq!(a.label_counts, b.label_counts);
        assert_eq!(a.severity_counts, b.severity_counts);
        assert_eq!(a.hourly_counts, b.hourly_counts);
        assert_eq!(a.first_captured_at, b.first_captured_at);
        assert_eq!(a.last_captured_at, b.last_captured_at);
    }

    // -- hour bucketing uses captured-at --

    #[test]
    fn hour_buckets_follow_captured_at() {
        let mut stats = RunningStats::new();
        stats.ingest(&good_frame(7, 59, 0.1));
        stats.ingest(&good_frame(8, 0, 0.1));
        stats.ingest(&good_frame(8, 30, 0.1));

        let snap = stats.snapshot(chrono::Duration::minutes(31));
        assert_eq!(
            snap.hourly_counts,
            vec![
                HourCount { hour: 7, frames: 1 },
                HourCount { hour: 8, frames: 2 },
            ]
        );
    }

    // -- throughput --

    #[test]
    fn throughput_per_minute() {
        let mut stats = RunningStats::new();
        for i in 0..10 {
            stats.ingest(&good_frame(9, i, 0.1));
        }
        // 10 frames over 5 minutes -> 2/min.
        let snap = stats.snapshot(chrono::Duration::minutes(5));
        assert_eq!(snap.frames_per_minute, 2.0);
    }

    #[test]
    fn throughput_zero_for_zero_elapsed() {
        let mut stats = RunningStats::new();
        stats.ingest(&good_frame(9, 0, 0.1));
        let snap = stats.snapshot(chrono::Duration::zero());
        assert_eq!(snap.frames_per_minute, 0.0);
    }

    // -- multi-defect frames --

    #[test]
    fn every_finding_counts_in_distributions() {
        let mut frame = defect_frame(9, 0, 0.9, "scratch", "major");
        frame.defects.push(DefectFinding {
            label: "dent".to_string(),
            confidence: 0.7,
            severity: "minor".to_string(),
            area_pct: 1.0,
            bounding_box: None,
        });

        let mut stats = RunningStats::new();
        stats.ingest(&frame);

        let snap = stats.snapshot(chrono::Duration::minutes(1));
        // One defective frame, two findings.
        assert_eq!(snap.defect_frames, 1);
        assert_eq!(snap.label_counts.len(), 2);
        assert_eq!(snap.label_counts.get("dent"), Some(&1));
    }
}
