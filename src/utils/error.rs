//! Error types and handling
//!
//! Common error types used across the crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::CaptureError;

/// Errors surfaced by session commands
///
/// Every failure path returns the session to a well-defined phase; none of
/// these is fatal to the controller.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a recording session is already active")]
    AlreadyActive,

    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    #[error("no capture device available: {0}")]
    DeviceUnavailable(String),

    #[error("encoder could not be opened: {0}")]
    EncoderOpenFailed(String),
}

impl From<CaptureError> for SessionError {
    fn from(error: CaptureError) -> Self {
        match error {
            CaptureError::PermissionDenied(msg) => SessionError::PermissionDenied(msg),
            CaptureError::DeviceUnavailable(msg) => SessionError::DeviceUnavailable(msg),
        }
    }
}

/// Error response for host frontends
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<SessionError> for ErrorResponse {
    fn from(error: SessionError) -> Self {
        let code = match &error {
            SessionError::AlreadyActive => "ALREADY_ACTIVE",
            SessionError::PermissionDenied(_) => "PERMISSION_DENIED",
            SessionError::DeviceUnavailable(_) => "DEVICE_UNAVAILABLE",
            SessionError::EncoderOpenFailed(_) => "ENCODER_OPEN_FAILED",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;
