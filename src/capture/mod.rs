//! Capture-source capability
//!
//! Platform-agnostic traits for microphone access. Concrete backends
//! (browsers, cpal, test fakes) live with the host; the controller only
//! depends on these contracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Constraints passed to an access request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConstraints {
    /// Request an audio input track
    pub audio: bool,

    /// Preferred input device ID (if any)
    pub device_id: Option<String>,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            device_id: None,
        }
    }
}

/// Why an access request failed
#[derive(Error, Debug, Clone)]
pub enum CaptureError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// A granted capture stream
///
/// Held exclusively by the controller while a recording is active. Stopping
/// the tracks releases the hardware; the handle is dropped afterwards.
pub trait CaptureStream: Send {
    /// Stop every track on the stream, releasing the input device.
    fn stop_all_tracks(&mut self);
}

/// Provider of capture streams
///
/// `request_access` is the controller's single suspension point: it may
/// prompt the user and resolves asynchronously.
#[async_trait]
pub trait CaptureProvider: Send + Sync {
    async fn request_access(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError>;
}
