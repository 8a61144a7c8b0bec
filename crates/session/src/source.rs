//! Camera abstraction: acquiring a device and pulling raw frames.
//!
//! The engine only sees the [`CameraGateway`] / [`FrameSource`] traits.
//! The production implementation treats a `source_id` as the snapshot
//! URL of a network camera (one HTTP GET per frame); tests substitute
//! scripted sources.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use argus_core::types::Timestamp;

use crate::error::EngineError;

/// Default budget for one camera HTTP round-trip.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// One raw image as pulled from a camera, stamped at capture time.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub captured_at: Timestamp,
    /// Encoded image bytes (JPEG for snapshot cameras).
    pub image: Vec<u8>,
}

/// Acquires exclusive capture access to a camera.
///
/// Acquisition failure maps to [`EngineError::DeviceUnavailable`] and
/// leaves no trace: the session row is only created after `acquire`
/// succeeds.
#[async_trait]
pub trait CameraGateway: Send + Sync {
    async fn acquire(&self, source_id: &str) -> Result<Box<dyn FrameSource>, EngineError>;
}

/// An acquired camera. Owned by exactly one capture loop; released only
/// when the session reaches a terminal state.
#[async_trait]
pub trait FrameSource: Send {
    /// Pull one frame. A failure here is a device-level fault and aborts
    /// the owning session.
    async fn capture_frame(&mut self) -> Result<RawFrame, EngineError>;

    /// Free the device handle.
    async fn release(self: Box<Self>);
}

// ---------------------------------------------------------------------------
// Snapshot camera (HTTP still-frame endpoint)
// ---------------------------------------------------------------------------

/// Gateway for network cameras exposing an HTTP snapshot endpoint.
///
/// The `source_id` is the snapshot URL itself. `acquire` probes it once
/// so a dead camera fails the session start instead of its first tick.
pub struct SnapshotGateway {
    client: reqwest::Client,
    timeout: Duration,
}

impl SnapshotGateway {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Default for SnapshotGateway {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_TIMEOUT)
    }
}

#[async_trait]
impl CameraGateway for SnapshotGateway {
    async fn acquire(&self, source_id: &str) -> Result<Box<dyn FrameSource>, EngineError> {
        let response = self
            .client
            .get(source_id)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| EngineError::DeviceUnavailable {
                source_id: source_id.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(EngineError::DeviceUnavailable {
                source_id: source_id.to_string(),
                reason: format!("probe returned HTTP {}", response.status()),
            });
        }

        Ok(Box::new(SnapshotCamera {
            client: self.client.clone(),
            url: source_id.to_string(),
            timeout: self.timeout,
        }))
    }
}

/// One acquired snapshot camera: a URL plus a pooled HTTP client.
pub struct SnapshotCamera {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

#[async_trait]
impl FrameSource for SnapshotCamera {
    async fn capture_frame(&mut self) -> Result<RawFrame, EngineError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| EngineError::CaptureFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::CaptureFailed(format!(
                "camera returned HTTP {status}"
            )));
        }

        let image = response
            .bytes()
            .await
            .map_err(|e| EngineError::CaptureFailed(e.to_string()))?
            .to_vec();
        if image.is_empty() {
            return Err(EngineError::CaptureFailed(
                "camera returned an empty body".to_string(),
            ));
        }

        Ok(RawFrame {
            captured_at: Utc::now(),
            image,
        })
    }

    async fn release(self: Box<Self>) {
        // Snapshot cameras are stateless on the device side; dropping the
        // pooled client connection is all the release there is.
    }
}
