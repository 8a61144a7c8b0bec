//! Session report building (PRD-43).
//!
//! [`build_report`] turns one session plus its full frame/defect history into
//! the report consumed by dashboards and exports: summary, trend series,
//! distributions, stage breakdown, and the anomaly histogram. The builder is
//! pure with respect to stored data — the same inputs always produce the same
//! report. The one wall-clock dependence, the duration of a still-running
//! session, is passed in as an explicit `now` and flagged with
//! `duration_is_estimate`.

use std::collections::BTreeMap;

use chrono::{Duration, DurationRound};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::numeric::{round_ms, round_pct, round_score, round_to, safe_pct};
use crate::severity::severity_rank;
use crate::stats::FrameObservation;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed anomaly-score histogram ranges. The final range includes 1.0.
pub const ANOMALY_BUCKETS: [(f64, f64); 5] = [
    (0.0, 0.2),
    (0.2, 0.4),
    (0.4, 0.6),
    (0.6, 0.8),
    (0.8, 1.0),
];

/// Display labels for [`ANOMALY_BUCKETS`], same order.
pub const ANOMALY_BUCKET_LABELS: [&str; 5] =
    ["0.0-0.2", "0.2-0.4", "0.4-0.6", "0.6-0.8", "0.8-1.0"];

/// Processing stages in pipeline order.
pub const STAGE_NAMES: [&str; 4] = ["preprocess", "anomaly", "classify", "postprocess"];

/// Above this many trend buckets the zero-fill between the first and last
/// bucket is skipped and only non-empty buckets are returned, keeping report
/// size bounded for histories that span months.
pub const MAX_TREND_BUCKETS: i64 = 1000;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The session fields the report builder needs; a projection of the
/// `inspection_sessions` row.
#[derive(Debug, Clone)]
pub struct SessionOverview {
    pub id: DbId,
    pub status: String,
    pub source_id: String,
    pub capture_interval_ms: i64,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub abort_reason: Option<String>,
}

/// Requested trend bucket width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGranularity {
    #[default]
    Hourly,
    Daily,
}

impl TrendGranularity {
    fn bucket_width(self) -> Duration {
        match self {
            Self::Hourly => Duration::hours(1),
            Self::Daily => Duration::days(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Human-facing session summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub session_id: DbId,
    pub status: String,
    pub source_id: String,
    pub capture_interval_ms: i64,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    /// Milliseconds from start to end (or to `now` while running).
    pub duration_ms: f64,
    /// True when the session has not ended and `duration_ms` is measured
    /// against the provided `now` instead of a finalized end timestamp.
    pub duration_is_estimate: bool,
    pub total_frames: i64,
    pub good_frames: i64,
    pub defect_frames: i64,
    pub defect_rate_pct: f64,
    pub avg_anomaly_score: Option<f64>,
    pub frames_per_minute: f64,
    /// The most frequent defect label, if any defects were found.
    pub top_defect: Option<LabelSlice>,
    pub abort_reason: Option<String>,
}

/// One time bucket of the trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    pub bucket_start: Timestamp,
    pub total: i64,
    pub good: i64,
    pub defective: i64,
}

/// One slice of the defect-label distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSlice {
    pub label: String,
    pub count: i64,
    /// Percentage of all defect findings, one decimal place.
    pub pct: f64,
}

/// One slice of the severity distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeveritySlice {
    pub severity: String,
    pub count: i64,
    pub pct: f64,
}

/// Processing-time breakdown for one pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageBreakdown {
    pub stage: &'static str,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    /// This stage's share of the summed per-stage averages.
    pub pct_of_total: f64,
}

/// One fixed-range anomaly histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyBucket {
    pub range: &'static str,
    pub range_start: f64,
    pub range_end: f64,
    pub count: i64,
    /// Percentage of all frames, one decimal place.
    pub pct: f64,
}

/// The full report for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub summary: ReportSummary,
    pub granularity: TrendGranularity,
    pub trend: Vec<TrendBucket>,
    pub label_distribution: Vec<LabelSlice>,
    pub severity_distribution: Vec<SeveritySlice>,
    pub stage_breakdown: Vec<StageBreakdown>,
    pub anomaly_histogram: Vec<AnomalyBucket>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the full report for a session from its frame/defect history.
///
/// Counters are recomputed from `frames` rather than read from the session
/// row, so the output is exactly what recomputation from stored data yields.
pub fn build_report(
    session: &SessionOverview,
    frames: &[FrameObservation],
    granularity: TrendGranularity,
    now: Timestamp,
) -> Result<SessionReport, CoreError> {
    Ok(SessionReport {
        summary: build_summary(session, frames, now),
        granularity,
        trend: build_trend(frames, granularity)?,
        label_distribution: build_label_distribution(frames),
        severity_distribution: build_severity_distribution(frames),
        stage_breakdown: build_stage_breakdown(frames),
        anomaly_histogram: build_anomaly_histogram(frames),
    })
}

fn build_summary(
    session: &SessionOverview,
    frames: &[FrameObservation],
    now: Timestamp,
) -> ReportSummary {
    let total = frames.len() as i64;
    let defective = frames.iter().filter(|f| f.is_defect).count() as i64;
    let good = total - defective;

    let end = session.ended_at.unwrap_or(now);
    let duration = (end - session.started_at).max(Duration::zero());
    let minutes = duration.num_milliseconds() as f64 / 60_000.0;

    let avg_anomaly = if total > 0 {
        let sum: f64 = frames.iter().map(|f| f.anomaly_score).sum();
        Some(round_score(sum / total as f64))
    } else {
        None
    };

    ReportSummary {
        session_id: session.id,
        status: session.status.clone(),
        source_id: session.source_id.clone(),
        capture_interval_ms: session.capture_interval_ms,
        started_at: session.started_at,
        ended_at: session.ended_at,
        duration_ms: round_ms(duration.num_milliseconds() as f64),
        duration_is_estimate: session.ended_at.is_none(),
        total_frames: total,
        good_frames: good,
        defect_frames: defective,
        defect_rate_pct: safe_pct(defective, total),
        avg_anomaly_score: avg_anomaly,
        frames_per_minute: if minutes > 0.0 {
            round_to(total as f64 / minutes, 2)
        } else {
            0.0
        },
        top_defect: build_label_distribution(frames).into_iter().next(),
        abort_reason: session.abort_reason.clone(),
    }
}

fn build_trend(
    frames: &[FrameObservation],
    granularity: TrendGranularity,
) -> Result<Vec<TrendBucket>, CoreError> {
    let width = granularity.bucket_width();

    let mut buckets: BTreeMap<Timestamp, (i64, i64)> = BTreeMap::new();
    for frame in frames {
        let key = frame
            .captured_at
            .duration_trunc(width)
            .map_err(|e| CoreError::Internal(format!("trend bucket truncation failed: {e}")))?;
        let entry = buckets.entry(key).or_insert((0, 0));
        if frame.is_defect {
            entry.1 += 1;
        } else {
            entry.0 += 1;
        }
    }

    let (Some(first), Some(last)) = (
        buckets.keys().next().copied(),
        buckets.keys().next_back().copied(),
    ) else {
        return Ok(Vec::new());
    };

    let span = (last - first).num_milliseconds() / width.num_milliseconds() + 1;
    if span > MAX_TREND_BUCKETS {
        // Sparse fallback: non-empty buckets only, still in order.
        return Ok(buckets
            .into_iter()
            .map(|(bucket_start, (good, defective))| TrendBucket {
                bucket_start,
                total: good + defective,
                good,
                defective,
            })
            .collect());
    }

    // Zero-fill so consumers can chart a continuous series.
    let mut series = Vec::with_capacity(span as usize);
    let mut bucket_start = first;
    loop {
        let (good, defective) = buckets.get(&bucket_start).copied().unwrap_or((0, 0));
        series.push(TrendBucket {
            bucket_start,
            total: good + defective,
            good,
            defective,
        });
        if bucket_start >= last {
            break;
        }
        bucket_start += width;
    }
    Ok(series)
}

fn build_label_distribution(frames: &[FrameObservation]) -> Vec<LabelSlice> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for frame in frames {
        for defect in &frame.defects {
            *counts.entry(defect.label.as_str()).or_insert(0) += 1;
        }
    }
    let total_findings: i64 = counts.values().sum();

    let mut slices: Vec<LabelSlice> = counts
        .into_iter()
        .map(|(label, count)| LabelSlice {
            label: label.to_string(),
            count,
            pct: safe_pct(count, total_findings),
        })
        .collect();
    // Count descending; the BTreeMap origin makes ties resolve
    // alphabetically, keeping the output deterministic.
    slices.sort_by(|a, b| b.count.cmp(&a.count).then(a.label.cmp(&b.label)));
    slices
}

fn build_severity_distribution(frames: &[FrameObservation]) -> Vec<SeveritySlice> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for frame in frames {
        for defect in &frame.defects {
            *counts.entry(defect.severity.as_str()).or_insert(0) += 1;
        }
    }
    let total_findings: i64 = counts.values().sum();

    let mut slices: Vec<SeveritySlice> = counts
        .into_iter()
        .map(|(severity, count)| SeveritySlice {
            severity: severity.to_string(),
            count,
            pct: safe_pct(count, total_findings),
        })
        .collect();
    // Most severe first; unknown severities sink to the end alphabetically.
    slices.sort_by(|a, b| {
        severity_rank(&b.severity)
            .cmp(&severity_rank(&a.severity))
            .then(a.severity.cmp(&b.severity))
    });
    slices
}

fn build_stage_breakdown(frames: &[FrameObservation]) -> Vec<StageBreakdown> {
    const STAGE_ACCESSORS: [fn(&FrameObservation) -> f64; 4] = [
        |f| f.timings.preprocess_ms,
        |f| f.timings.anomaly_ms,
        |f| f.timings.classify_ms,
        |f| f.timings.postprocess_ms,
    ];

    let n = frames.len();
    let mut avgs = [0.0f64; 4];
    let mut mins = [0.0f64; 4];
    let mut maxes = [0.0f64; 4];

    if n > 0 {
        for (i, accessor) in STAGE_ACCESSORS.iter().enumerate() {
            let mut sum = 0.0;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for frame in frames {
                let v = accessor(frame);
                sum += v;
                min = min.min(v);
                max = max.max(v);
            }
            avgs[i] = sum / n as f64;
            mins[i] = min;
            maxes[i] = max;
        }
    }

    let total_avg: f64 = avgs.iter().sum();
    STAGE_NAMES
        .into_iter()
        .enumerate()
        .map(|(i, stage)| StageBreakdown {
            stage,
            avg_ms: round_ms(avgs[i]),
            min_ms: round_ms(mins[i]),
            max_ms: round_ms(maxes[i]),
            pct_of_total: if total_avg > 0.0 {
                round_pct(100.0 * avgs[i] / total_avg)
            } else {
                0.0
            },
        })
        .collect()
}

/// Index of the histogram bucket for an anomaly score.
///
/// Scores are validated to 0..1 at the analyzer boundary; out-of-range
/// values are clamped into the edge buckets rather than panicking. Bucket
/// edges are compared against the literal bounds (not derived by division)
/// so that e.g. 0.6 lands exactly in `[0.6,0.8)`.
fn anomaly_bucket_index(score: f64) -> usize {
    let clamped = score.clamp(0.0, 1.0);
    ANOMALY_BUCKETS
        .iter()
        .rposition(|(start, _)| clamped >= *start)
        .unwrap_or(0)
}

fn build_anomaly_histogram(frames: &[FrameObservation]) -> Vec<AnomalyBucket> {
    let mut counts = [0i64; 5];
    for frame in frames {
        counts[anomaly_bucket_index(frame.anomaly_score)] += 1;
    }
    let total = frames.len() as i64;

    ANOMALY_BUCKETS
        .iter()
        .enumerate()
        .map(|(i, (start, end))| AnomalyBucket {
            range: ANOMALY_BUCKET_LABELS[i],
            range_start: *start,
            range_end: *end,
            count: counts[i],
            pct: safe_pct(counts[i], total),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{DefectFinding, StageTimings};
    use chrono::{TimeZone, Utc};

    fn ts(day: u32, hour: u32, min: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, hour, min, 0).unwrap()
    }

    fn session(ended: Option<Timestamp>) -> SessionOverview {
        SessionOverview {
            id: 11,
            status: if ended.is_some() { "completed" } else { "active" }.to_string(),
            source_id: "http://cam-7/snapshot".to_string(),
            capture_interval_ms: 1000,
            started_at: ts(14, 9, 0),
            ended_at: ended,
            abort_reason: None,
        }
    }

    fn frame(day: u32, hour: u32, min: u32, score: f64, label: Option<&str>) -> FrameObservation {
        FrameObservation {
            captured_at: ts(day, hour, min),
            is_defect: label.is_some(),
            anomaly_score: score,
            timings: StageTimings {
                preprocess_ms: 10.0,
                anomaly_ms: 40.0,
                classify_ms: 25.0,
                postprocess_ms: 5.0,
            },
            defects: label
                .map(|l| {
                    vec![DefectFinding {
                        label: l.to_string(),
                        confidence: 0.9,
                        severity: "major".to_string(),
                        area_pct: 2.0,
                        bounding_box: None,
                    }]
                })
                .unwrap_or_default(),
        }
    }

    // -- summary --

    #[test]
    fn summary_counts_and_rate() {
        // frame1 defective (scratch), frame2 good, frame3 defective (scratch).
        let frames = vec![
            frame(14, 9, 0, 0.9, Some("scratch")),
            frame(14, 9, 1, 0.1, None),
            frame(14, 9, 2, 0.8, Some("scratch")),
        ];
        let report = build_report(
            &session(Some(ts(14, 9, 3))),
            &frames,
            TrendGranularity::Hourly,
            ts(14, 12, 0),
        )
        .unwrap();

        let s = &report.summary;
        assert_eq!(s.total_frames, 3);
        assert_eq!(s.good_frames, 1);
        assert_eq!(s.defect_frames, 2);
        assert_eq!(s.defect_rate_pct, 66.7);
        assert!(!s.duration_is_estimate);
        assert_eq!(s.duration_ms, 180_000.0);
        assert_eq!(s.top_defect.as_ref().map(|t| t.label.as_str()), Some("scratch"));
        assert_eq!(s.top_defect.as_ref().map(|t| t.count), Some(2));
    }

    #[test]
    fn empty_session_reports_zero_rate() {
        let report = build_report(
            &session(Some(ts(14, 9, 10))),
            &[],
            TrendGranularity::Hourly,
            ts(14, 12, 0),
        )
        .unwrap();

        assert_eq!(report.summary.total_frames, 0);
        assert_eq!(report.summary.defect_rate_pct, 0.0);
        assert_eq!(report.summary.avg_anomaly_score, None);
        assert_eq!(report.summary.frames_per_minute, 0.0);
        assert!(report.trend.is_empty());
        assert!(report.label_distribution.is_empty());
        // Histogram keeps its five fixed ranges even when empty.
        assert_eq!(report.anomaly_histogram.len(), 5);
        assert!(report.anomaly_histogram.iter().all(|b| b.count == 0));
    }

    #[test]
    fn running_session_duration_is_estimate() {
        let now = ts(14, 9, 30);
        let report =
            build_report(&session(None), &[], TrendGranularity::Hourly, now).unwrap();
        assert!(report.summary.duration_is_estimate);
        assert_eq!(report.summary.duration_ms, 1_800_000.0);
    }

    // -- purity --

    #[test]
    fn identical_inputs_build_identical_reports() {
        let frames = vec![
            frame(14, 9, 0, 0.9, Some("scratch")),
            frame(14, 10, 1, 0.1, None),
        ];
        let s = session(Some(ts(14, 11, 0)));
        let now = ts(14, 12, 0);
        let a = build_report(&s, &frames, TrendGranularity::Hourly, now).unwrap();
        let b = build_report(&s, &frames, TrendGranularity::Hourly, now).unwrap();
        assert_eq!(a, b);
    }

    // -- trend --

    #[test]
    fn hourly_trend_zero_fills_gaps() {
        // Frames at 09:xx and 11:xx; 10:00 must appear with zero counts.
        let frames = vec![
            frame(14, 9, 5, 0.9, Some("scratch")),
            frame(14, 11, 5, 0.1, None),
        ];
        let report = build_report(
            &session(Some(ts(14, 12, 0))),
            &frames,
            TrendGranularity::Hourly,
            ts(14, 12, 0),
        )
        .unwrap();

        let trend = &report.trend;
        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].bucket_start, ts(14, 9, 0));
        assert_eq!(trend[0].defective, 1);
        assert_eq!(trend[1].bucket_start, ts(14, 10, 0));
        assert_eq!(trend[1].total, 0);
        assert_eq!(trend[2].bucket_start, ts(14, 11, 0));
        assert_eq!(trend[2].good, 1);
    }

    #[test]
    fn daily_trend_buckets_by_date() {
        let frames = vec![
            frame(14, 9, 0, 0.9, Some("scratch")),
            frame(14, 23, 0, 0.2, None),
            frame(15, 1, 0, 0.3, None),
        ];
        let report = build_report(
            &session(Some(ts(15, 2, 0))),
            &frames,
            TrendGranularity::Daily,
            ts(15, 3, 0),
        )
        .unwrap();

        let trend = &report.trend;
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].bucket_start, ts(14, 0, 0));
        assert_eq!(trend[0].total, 2);
        assert_eq!(trend[1].bucket_start, ts(15, 0, 0));
        assert_eq!(trend[1].total, 1);
    }

    #[test]
    fn trend_uses_captured_at_not_input_order() {
        // Arrival order reversed relative to capture times.
        let frames = vec![
            frame(14, 11, 0, 0.1, None),
            frame(14, 9, 0, 0.9, Some("scratch")),
        ];
        let report = build_report(
            &session(Some(ts(14, 12, 0))),
            &frames,
            TrendGranularity::Hourly,
            ts(14, 12, 0),
        )
        .unwrap();
        assert_eq!(report.trend.first().map(|b| b.bucket_start), Some(ts(14, 9, 0)));
    }

    // -- distributions --

    #[test]
    fn label_distribution_sorted_by_count() {
        let frames = vec![
            frame(14, 9, 0, 0.9, Some("scratch")),
            frame(14, 9, 1, 0.8, Some("dent")),
            frame(14, 9, 2, 0.85, Some("scratch")),
        ];
        let report = build_report(
            &session(Some(ts(14, 10, 0))),
            &frames,
            TrendGranularity::Hourly,
            ts(14, 10, 0),
        )
        .unwrap();

        let labels = &report.label_distribution;
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label, "scratch");
        assert_eq!(labels[0].count, 2);
        assert_eq!(labels[0].pct, 66.7);
        assert_eq!(labels[1].label, "dent");
        assert_eq!(labels[1].pct, 33.3);
    }

    #[test]
    fn severity_distribution_sorted_most_severe_first() {
        let mut f1 = frame(14, 9, 0, 0.9, Some("scratch"));
        f1.defects[0].severity = "minor".to_string();
        let mut f2 = frame(14, 9, 1, 0.95, Some("crack"));
        f2.defects[0].severity = "critical".to_string();

        let report = build_report(
            &session(Some(ts(14, 10, 0))),
            &[f1, f2],
            TrendGranularity::Hourly,
            ts(14, 10, 0),
        )
        .unwrap();

        let severities = &report.severity_distribution;
        assert_eq!(severities[0].severity, "critical");
        assert_eq!(severities[1].severity, "minor");
        assert_eq!(severities[0].pct, 50.0);
    }

    // -- stage breakdown --

    #[test]
    fn stage_breakdown_avg_min_max_and_share() {
        let mut fast = frame(14, 9, 0, 0.1, None);
        fast.timings = StageTimings {
            preprocess_ms: 10.0,
            anomaly_ms: 30.0,
            classify_ms: 15.0,
            postprocess_ms: 5.0,
        };
        let mut slow = frame(14, 9, 1, 0.1, None);
        slow.timings = StageTimings {
            preprocess_ms: 20.0,
            anomaly_ms: 50.0,
            classify_ms: 25.0,
            postprocess_ms: 15.0,
        };

        let report = build_report(
            &session(Some(ts(14, 10, 0))),
            &[fast, slow],
            TrendGranularity::Hourly,
            ts(14, 10, 0),
        )
        .unwrap();

        let stages = &report.stage_breakdown;
        assert_eq!(stages.len(), 4);
        assert_eq!(stages[0].stage, "preprocess");
        assert_eq!(stages[0].avg_ms, 15.0);
        assert_eq!(stages[0].min_ms, 10.0);
        assert_eq!(stages[0].max_ms, 20.0);
        // Averages: 15 + 40 + 20 + 10 = 85 total.
        assert_eq!(stages[1].stage, "anomaly");
        assert_eq!(stages[1].avg_ms, 40.0);
        assert_eq!(stages[1].pct_of_total, 47.1);
        let pct_sum: f64 = stages.iter().map(|s| s.pct_of_total).sum();
        assert!((pct_sum - 100.0).abs() < 0.5);
    }

    #[test]
    fn stage_breakdown_zeroes_for_empty_history() {
        let report = build_report(
            &session(Some(ts(14, 10, 0))),
            &[],
            TrendGranularity::Hourly,
            ts(14, 10, 0),
        )
        .unwrap();
        assert_eq!(report.stage_breakdown.len(), 4);
        for stage in &report.stage_breakdown {
            assert_eq!(stage.avg_ms, 0.0);
            assert_eq!(stage.min_ms, 0.0);
            assert_eq!(stage.pct_of_total, 0.0);
        }
    }

    // -- anomaly histogram --

    #[test]
    fn histogram_bucket_edges() {
        assert_eq!(anomaly_bucket_index(0.0), 0);
        assert_eq!(anomaly_bucket_index(0.19), 0);
        assert_eq!(anomaly_bucket_index(0.2), 1);
        assert_eq!(anomaly_bucket_index(0.59), 2);
        assert_eq!(anomaly_bucket_index(0.6), 3);
        assert_eq!(anomaly_bucket_index(0.8), 4);
        // The final range is inclusive of 1.0.
        assert_eq!(anomaly_bucket_index(1.0), 4);
    }

    #[test]
    fn histogram_counts_and_percentages() {
        let frames = vec![
            frame(14, 9, 0, 0.05, None),
            frame(14, 9, 1, 0.15, None),
            frame(14, 9, 2, 0.55, None),
            frame(14, 9, 3, 0.95, Some("crack")),
        ];
        let report = build_report(
            &session(Some(ts(14, 10, 0))),
            &frames,
            TrendGranularity::Hourly,
            ts(14, 10, 0),
        )
        .unwrap();

        let histogram = &report.anomaly_histogram;
        assert_eq!(histogram[0].count, 2);
        assert_eq!(histogram[0].pct, 50.0);
        assert_eq!(histogram[1].count, 0);
        assert_eq!(histogram[2].count, 1);
        assert_eq!(histogram[4].count, 1);
        assert_eq!(histogram[4].range, "0.8-1.0");
    }
}
