//! HTTP client for the defect analysis service.
//!
//! One `POST /v1/analyze` call per frame, image bytes as multipart
//! form data, bounded per-request timeout. The engine talks to the
//! [`DefectAnalyzer`] trait so tests can swap in a scripted analyzer.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AnalyzerError;
use crate::verdict::AnalysisVerdict;

/// Default budget for one analysis round-trip.
pub const DEFAULT_ANALYZE_TIMEOUT: Duration = Duration::from_secs(15);

/// A service that turns a captured frame into an analysis verdict.
///
/// The engine holds at most one analysis in flight per session, so
/// implementations do not need internal queueing.
#[async_trait]
pub trait DefectAnalyzer: Send + Sync {
    /// Analyze one frame image. The call must resolve within the
    /// implementation's own bounded timeout; a timeout is reported as an
    /// ordinary [`AnalyzerError`].
    async fn analyze(&self, image: Vec<u8>) -> Result<AnalysisVerdict, AnalyzerError>;
}

/// HTTP client for a single analysis service instance.
pub struct HttpAnalyzer {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAnalyzer {
    /// Create a client for the given base URL, e.g. `http://host:9090`.
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across services).
    pub fn with_client(client: reqwest::Client, base_url: String, timeout: Duration) -> Self {
        Self {
            client,
            base_url,
            timeout,
        }
    }

    // ---- private helpers ----

    /// Classify a transport error, folding timeouts into
    /// [`AnalyzerError::Timeout`].
    fn map_request_error(&self, e: reqwest::Error) -> AnalyzerError {
        if e.is_timeout() {
            AnalyzerError::Timeout {
                budget_ms: self.timeout.as_millis() as u64,
            }
        } else {
            AnalyzerError::Request(e)
        }
    }

    /// Ensure the response has a success status code, or map it to
    /// [`AnalyzerError::Service`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalyzerError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AnalyzerError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DefectAnalyzer for HttpAnalyzer {
    async fn analyze(&self, image: Vec<u8>) -> Result<AnalysisVerdict, AnalyzerError> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name("frame.jpg")
            .mime_str("image/jpeg")
            .map_err(AnalyzerError::Request)?;
        let form = reqwest::multipart::Form::new().part("frame", part);

        let response = self
            .client
            .post(format!("{}/v1/analyze", self.base_url))
            .timeout(self.timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let response = Self::ensure_success(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;
        let verdict = serde_json::from_str::<AnalysisVerdict>(&body)
            .map_err(|e| AnalyzerError::InvalidPayload(format!("invalid verdict JSON: {e}")))?;

        tracing::debug!(
            is_defect = verdict.is_defect,
            anomaly_score = verdict.anomaly_score,
            "Received analysis verdict"
        );
        Ok(verdict)
    }
}
