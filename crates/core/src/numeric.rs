//! Shared numeric rounding and ratio helpers (PRD-43).
//!
//! Report and statistics output follow fixed conventions: percentages to one
//! decimal place, anomaly scores to four, durations in milliseconds to two.
//! Centralized here so the aggregator and the report builder cannot drift
//! apart (DRY-41).

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Percentages: one decimal place.
pub fn round_pct(value: f64) -> f64 {
    round_to(value, 1)
}

/// Durations in milliseconds: two decimal places.
pub fn round_ms(value: f64) -> f64 {
    round_to(value, 2)
}

/// Anomaly scores: four decimal places.
pub fn round_score(value: f64) -> f64 {
    round_to(value, 4)
}

/// Percentage of `part` in `whole`, rounded to one decimal place.
///
/// An empty whole reports `0.0`, never a division error — a session with
/// zero frames has a defect rate of exactly zero.
pub fn safe_pct(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_pct(100.0 * part as f64 / whole as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- round_to --

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_to(66.66666, 1), 66.7);
        assert_eq!(round_to(0.12345, 4), 0.1235);
        assert_eq!(round_to(12.344, 2), 12.34);
    }

    #[test]
    fn rounding_is_stable_for_exact_values() {
        assert_eq!(round_to(50.0, 1), 50.0);
        assert_eq!(round_to(0.2, 4), 0.2);
    }

    // -- safe_pct --

    #[test]
    fn pct_of_zero_whole_is_zero() {
        assert_eq!(safe_pct(0, 0), 0.0);
        assert_eq!(safe_pct(5, 0), 0.0);
    }

    #[test]
    fn pct_two_of_three() {
        assert_eq!(safe_pct(2, 3), 66.7);
    }

    #[test]
    fn pct_full() {
        assert_eq!(safe_pct(4, 4), 100.0);
    }

    #[test]
    fn pct_zero_part() {
        assert_eq!(safe_pct(0, 10), 0.0);
    }
}
