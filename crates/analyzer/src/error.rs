//! Errors from the defect analysis service layer.

/// Errors from one analysis round-trip.
///
/// All variants are per-frame and non-fatal to the owning session: the
/// engine drops the frame, emits a `frame.dropped` event and keeps
/// capturing. Only device-level failures abort a session.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The HTTP request itself failed (network, DNS, TLS).
    #[error("analysis request failed: {0}")]
    Request(reqwest::Error),

    /// The round-trip exceeded the configured budget.
    #[error("analysis timed out after {budget_ms} ms")]
    Timeout {
        /// The timeout budget that was exhausted, in milliseconds.
        budget_ms: u64,
    },

    /// The service returned a non-2xx status code.
    #[error("analysis service error ({status}): {body}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed as JSON but violated the verdict schema
    /// (missing fields, out-of-range scores, unknown severity).
    #[error("malformed analysis response: {0}")]
    InvalidPayload(String),
}
