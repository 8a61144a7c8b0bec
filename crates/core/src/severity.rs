//! Well-known defect severity constants (PRD-42).
//!
//! These match the CHECK constraint on `defect_findings.severity` and the
//! values emitted by the analysis service.

use crate::error::CoreError;

/// Defect requires immediate attention; the part is scrap.
pub const SEVERITY_CRITICAL: &str = "critical";

/// Defect is out of tolerance; rework may be possible.
pub const SEVERITY_MAJOR: &str = "major";

/// Cosmetic defect within functional tolerance.
pub const SEVERITY_MINOR: &str = "minor";

/// All severities accepted from the analysis service, most severe first.
pub const VALID_SEVERITIES: [&str; 3] = [SEVERITY_CRITICAL, SEVERITY_MAJOR, SEVERITY_MINOR];

/// Ordering weight for a severity, higher is more severe.
///
/// Unknown strings rank below every known severity so that distributions
/// sorted by rank keep known categories first.
pub fn severity_rank(severity: &str) -> u8 {
    match severity {
        SEVERITY_CRITICAL => 3,
        SEVERITY_MAJOR => 2,
        SEVERITY_MINOR => 1,
        _ => 0,
    }
}

/// Validate a severity string against the known set.
pub fn validate_severity(severity: &str) -> Result<(), CoreError> {
    if VALID_SEVERITIES.contains(&severity) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown defect severity '{severity}', expected one of: {}",
            VALID_SEVERITIES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_severities_validate() {
        for severity in VALID_SEVERITIES {
            assert!(validate_severity(severity).is_ok());
        }
    }

    #[test]
    fn unknown_severity_rejected() {
        assert!(validate_severity("catastrophic").is_err());
        assert!(validate_severity("").is_err());
    }

    #[test]
    fn severity_case_sensitive() {
        // The analysis service contract is lowercase; "Critical" is malformed.
        assert!(validate_severity("Critical").is_err());
    }

    #[test]
    fn rank_orders_most_severe_first() {
        assert!(severity_rank(SEVERITY_CRITICAL) > severity_rank(SEVERITY_MAJOR));
        assert!(severity_rank(SEVERITY_MAJOR) > severity_rank(SEVERITY_MINOR));
        assert!(severity_rank(SEVERITY_MINOR) > severity_rank("unknown"));
    }
}
