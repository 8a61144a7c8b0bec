//! Typed analysis verdict and boundary validation.
//!
//! The analysis service responds with JSON of the shape
//! `{"is_defect": bool, "anomaly_score": f64, "defects": [...],
//! "stage_timings": {...}}`. This module deserializes it into a typed
//! [`AnalysisVerdict`] and converts it into a core
//! [`FrameObservation`], rejecting out-of-range values so nothing
//! unchecked reaches the aggregator.

use serde::Deserialize;

use argus_core::severity::validate_severity;
use argus_core::stats::{BoundingBox, DefectFinding, FrameObservation, StageTimings};
use argus_core::types::Timestamp;

use crate::error::AnalyzerError;

/// Top-level verdict returned by `POST /v1/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisVerdict {
    pub is_defect: bool,
    pub anomaly_score: f64,
    #[serde(default)]
    pub defects: Vec<VerdictDefect>,
    #[serde(default)]
    pub stage_timings: VerdictTimings,
}

/// One defect finding as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct VerdictDefect {
    pub label: String,
    pub confidence: f64,
    pub severity: String,
    #[serde(default)]
    pub area_pct: f64,
    pub bounding_box: Option<VerdictBox>,
}

/// Relative bounding box in 0..1 frame coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VerdictBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Per-stage timings in milliseconds. Stages the service omits count
/// as zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VerdictTimings {
    #[serde(default)]
    pub preprocess_ms: f64,
    #[serde(default)]
    pub anomaly_ms: f64,
    #[serde(default)]
    pub classify_ms: f64,
    #[serde(default)]
    pub postprocess_ms: f64,
}

impl AnalysisVerdict {
    /// Validate the verdict and convert it into a [`FrameObservation`]
    /// stamped with the frame's capture time.
    ///
    /// Checks: anomaly score and confidences in 0..1, `area_pct` in
    /// 0..100, severities from the known vocabulary, timings
    /// non-negative. Any violation maps to
    /// [`AnalyzerError::InvalidPayload`].
    pub fn into_observation(
        self,
        captured_at: Timestamp,
    ) -> Result<FrameObservation, AnalyzerError> {
        check_unit_range("anomaly_score", self.anomaly_score)?;
        check_timing("preprocess_ms", self.stage_timings.preprocess_ms)?;
        check_timing("anomaly_ms", self.stage_timings.anomaly_ms)?;
        check_timing("classify_ms", self.stage_timings.classify_ms)?;
        check_timing("postprocess_ms", self.stage_timings.postprocess_ms)?;

        let mut defects = Vec::with_capacity(self.defects.len());
        for defect in self.defects {
            if defect.label.trim().is_empty() {
                return Err(AnalyzerError::InvalidPayload(
                    "defect label must not be empty".to_string(),
                ));
            }
            check_unit_range("confidence", defect.confidence)?;
            validate_severity(&defect.severity)
                .map_err(|e| AnalyzerError::InvalidPayload(e.to_string()))?;
            if !(0.0..=100.0).contains(&defect.area_pct) {
                return Err(AnalyzerError::InvalidPayload(format!(
                    "area_pct out of range: {}",
                    defect.area_pct
                )));
            }
            defects.push(DefectFinding {
                label: defect.label,
                confidence: defect.confidence,
                severity: defect.severity,
                area_pct: defect.area_pct,
                bounding_box: defect.bounding_box.map(|b| BoundingBox {
                    x: b.x,
                    y: b.y,
                    width: b.width,
                    height: b.height,
                }),
            });
        }

        Ok(FrameObservation {
            captured_at,
            is_defect: self.is_defect,
            anomaly_score: self.anomaly_score,
            timings: StageTimings {
                preprocess_ms: self.stage_timings.preprocess_ms,
                anomaly_ms: self.stage_timings.anomaly_ms,
                classify_ms: self.stage_timings.classify_ms,
                postprocess_ms: self.stage_timings.postprocess_ms,
            },
            defects,
        })
    }
}

fn check_unit_range(field: &str, value: f64) -> Result<(), AnalyzerError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(AnalyzerError::InvalidPayload(format!(
            "{field} out of range: {value}"
        )));
    }
    Ok(())
}

fn check_timing(field: &str, value: f64) -> Result<(), AnalyzerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalyzerError::InvalidPayload(format!(
            "{field} must be a non-negative duration, got {value}"
        )));
    }
    Ok(())
}
