//! Postgres-backed session persistence (PRD-41, PRD-42).
//!
//! [`PgSessionStore`] implements the engine's `SessionStore` trait on top
//! of the `argus-db` repositories, and the free functions translate between
//! stored rows and the engine/core types. The reverse mapping
//! ([`frame_observations`]) is what lets statistics and reports for a
//! finished session be recomputed from rows through the exact same pure
//! aggregation code the live engine runs.

use std::collections::HashMap;

use async_trait::async_trait;

use argus_core::capture::CaptureConfig;
use argus_core::report::SessionOverview;
use argus_core::stats::{
    BoundingBox, DefectFinding, FrameObservation, SessionCounters, StageTimings,
};
use argus_core::types::{DbId, Timestamp};
use argus_db::models::defect::{DefectFindingRow, NewDefectFinding};
use argus_db::models::frame::{Frame, NewFrame};
use argus_db::models::session::InspectionSession;
use argus_db::repositories::{FrameRepo, SessionRepo};
use argus_db::DbPool;
use argus_session::store::{SessionOutcome, SessionStore};
use argus_session::StoreError;

// ---------------------------------------------------------------------------
// PgSessionStore
// ---------------------------------------------------------------------------

/// The production `SessionStore`: one connection pool, stateless otherwise.
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create_session(
        &self,
        operator_id: Option<&str>,
        config: &CaptureConfig,
    ) -> Result<DbId, StoreError> {
        let row = SessionRepo::create(
            &self.pool,
            &config.source_id,
            operator_id,
            config.interval_ms,
            config.auto_capture,
        )
        .await
        .map_err(StoreError::new)?;
        Ok(row.id)
    }

    async fn append_frame(
        &self,
        session_id: DbId,
        frame: &FrameObservation,
    ) -> Result<DbId, StoreError> {
        let new_frame = NewFrame {
            session_id,
            captured_at: frame.captured_at,
            is_defect: frame.is_defect,
            anomaly_score: frame.anomaly_score,
            preprocess_ms: frame.timings.preprocess_ms,
            anomaly_ms: frame.timings.anomaly_ms,
            classify_ms: frame.timings.classify_ms,
            postprocess_ms: frame.timings.postprocess_ms,
        };
        let defects: Vec<NewDefectFinding> = frame.defects.iter().map(finding_to_row).collect();

        FrameRepo::insert_with_defects(&self.pool, &new_frame, &defects)
            .await
            .map_err(StoreError::new)
    }

    async fn update_counters(
        &self,
        session_id: DbId,
        counters: SessionCounters,
    ) -> Result<(), StoreError> {
        SessionRepo::update_counters(
            &self.pool,
            session_id,
            counters.total_frames,
            counters.good_frames,
            counters.defect_frames,
        )
        .await
        .map_err(StoreError::new)
    }

    async fn update_status(&self, session_id: DbId, status: &str) -> Result<(), StoreError> {
        SessionRepo::set_status(&self.pool, session_id, status)
            .await
            .map_err(StoreError::new)?;
        Ok(())
    }

    async fn update_interval(
        &self,
        session_id: DbId,
        capture_interval_ms: i64,
    ) -> Result<(), StoreError> {
        SessionRepo::update_interval(&self.pool, session_id, capture_interval_ms)
            .await
            .map_err(StoreError::new)?;
        Ok(())
    }

    async fn finalize(
        &self,
        session_id: DbId,
        outcome: SessionOutcome,
        ended_at: Timestamp,
        counters: SessionCounters,
        abort_reason: Option<&str>,
    ) -> Result<(), StoreError> {
        match outcome {
            SessionOutcome::Completed => {
                SessionRepo::mark_stopped(&self.pool, session_id, ended_at)
                    .await
                    .map_err(StoreError::new)?;
            }
            SessionOutcome::Aborted => {
                SessionRepo::mark_aborted(
                    &self.pool,
                    session_id,
                    abort_reason.unwrap_or("aborted"),
                    ended_at,
                )
                .await
                .map_err(StoreError::new)?;
            }
        }

        SessionRepo::update_counters(
            &self.pool,
            session_id,
            counters.total_frames,
            counters.good_frames,
            counters.defect_frames,
        )
        .await
        .map_err(StoreError::new)
    }
}

// ---------------------------------------------------------------------------
// Row <-> domain mapping
// ---------------------------------------------------------------------------

/// Project a session row into the report builder's input.
pub fn overview_from_row(row: &InspectionSession) -> SessionOverview {
    SessionOverview {
        id: row.id,
        status: row.status.clone(),
        source_id: row.source_id.clone(),
        capture_interval_ms: row.capture_interval_ms,
        started_at: row.started_at,
        ended_at: row.ended_at,
        abort_reason: row.abort_reason.clone(),
    }
}

/// Rebuild frame observations from persisted rows.
///
/// `defects` may cover any superset of `frames` (it is usually the whole
/// session); findings are matched to their frame by `frame_id` and
/// findings without a matching frame are dropped.
pub fn frame_observations(
    frames: &[Frame],
    defects: Vec<DefectFindingRow>,
) -> Vec<FrameObservation> {
    let mut by_frame: HashMap<DbId, Vec<DefectFinding>> = HashMap::new();
    for row in defects {
        by_frame
            .entry(row.frame_id)
            .or_default()
            .push(finding_from_row(row));
    }

    frames
        .iter()
        .map(|frame| FrameObservation {
            captured_at: frame.captured_at,
            is_defect: frame.is_defect,
            anomaly_score: frame.anomaly_score,
            timings: StageTimings {
                preprocess_ms: frame.preprocess_ms,
                anomaly_ms: frame.anomaly_ms,
                classify_ms: frame.classify_ms,
                postprocess_ms: frame.postprocess_ms,
            },
            defects: by_frame.remove(&frame.id).unwrap_or_default(),
        })
        .collect()
}

// ---- private helpers ----

fn finding_to_row(finding: &DefectFinding) -> NewDefectFinding {
    NewDefectFinding {
        label: finding.label.clone(),
        confidence: finding.confidence,
        severity: finding.severity.clone(),
        area_pct: finding.area_pct,
        bounding_box: bounding_box_value(finding.bounding_box),
    }
}

fn finding_from_row(row: DefectFindingRow) -> DefectFinding {
    DefectFinding {
        label: row.label,
        confidence: row.confidence,
        severity: row.severity,
        area_pct: row.area_pct,
        // A frame without a box stores JSON null; deserialization failure
        // on anything else degrades to "no box" rather than failing the
        // whole history read.
        bounding_box: serde_json::from_value::<BoundingBox>(row.bounding_box).ok(),
    }
}

fn bounding_box_value(bounding_box: Option<BoundingBox>) -> serde_json::Value {
    serde_json::to_value(bounding_box).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn frame_row(id: DbId, is_defect: bool) -> Frame {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        Frame {
            id,
            session_id: 7,
            captured_at: at,
            is_defect,
            anomaly_score: if is_defect { 0.9 } else { 0.05 },
            preprocess_ms: 4.0,
            anomaly_ms: 18.0,
            classify_ms: 9.0,
            postprocess_ms: 2.0,
            created_at: at,
        }
    }

    fn finding_row(frame_id: DbId, label: &str, bounding_box: serde_json::Value) -> DefectFindingRow {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        DefectFindingRow {
            id: frame_id * 10,
            frame_id,
            session_id: 7,
            label: label.to_string(),
            confidence: 0.88,
            severity: "major".to_string(),
            area_pct: 2.5,
            bounding_box,
            created_at: at,
        }
    }

    #[test]
    fn observations_group_findings_by_frame() {
        let frames = vec![frame_row(1, true), frame_row(2, false), frame_row(3, true)];
        let defects = vec![
            finding_row(1, "scratch", serde_json::Value::Null),
            finding_row(3, "dent", serde_json::Value::Null),
            finding_row(3, "scratch", serde_json::Value::Null),
        ];

        let observations = frame_observations(&frames, defects);

        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0].defects.len(), 1);
        assert_eq!(observations[0].defects[0].label, "scratch");
        assert!(observations[1].defects.is_empty());
        assert_eq!(observations[2].defects.len(), 2);
        assert_eq!(observations[2].timings.anomaly_ms, 18.0);
    }

    #[test]
    fn bounding_box_survives_the_json_column() {
        let stored = bounding_box_value(Some(BoundingBox {
            x: 0.1,
            y: 0.2,
            width: 0.3,
            height: 0.25,
        }));
        let defects = vec![finding_row(1, "crack", stored)];
        let frames = vec![frame_row(1, true)];

        let observations = frame_observations(&frames, defects);

        let bbox = observations[0].defects[0]
            .bounding_box
            .expect("box should round-trip");
        assert_eq!(bbox.x, 0.1);
        assert_eq!(bbox.height, 0.25);
    }

    #[test]
    fn absent_and_malformed_boxes_map_to_none() {
        assert_eq!(bounding_box_value(None), serde_json::Value::Null);

        let defects = vec![
            finding_row(1, "crack", serde_json::Value::Null),
            finding_row(1, "crack", json!({"x": "not a number"})),
        ];
        let frames = vec![frame_row(1, true)];

        let observations = frame_observations(&frames, defects);
        assert!(observations[0].defects[0].bounding_box.is_none());
        assert!(observations[0].defects[1].bounding_box.is_none());
    }

    #[test]
    fn overview_projection_copies_terminal_fields() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        let row = InspectionSession {
            id: 7,
            source_id: "http://cam-7/snapshot".to_string(),
            operator_id: Some("op-3".to_string()),
            status: "aborted".to_string(),
            capture_interval_ms: 500,
            auto_capture: true,
            started_at: at,
            ended_at: Some(at + chrono::Duration::minutes(5)),
            abort_reason: Some("device failure: sensor read timed out".to_string()),
            total_frames: 12,
            good_frames: 10,
            defect_frames: 2,
            created_at: at,
            updated_at: at,
        };

        let overview = overview_from_row(&row);
        assert_eq!(overview.id, 7);
        assert_eq!(overview.status, "aborted");
        assert_eq!(overview.capture_interval_ms, 500);
        assert_eq!(
            overview.abort_reason.as_deref(),
            Some("device failure: sensor read timed out")
        );
    }
}
