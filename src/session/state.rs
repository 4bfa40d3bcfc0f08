//! Session state management
//!
//! Defines the session phase machine, configuration, and the projection
//! handed to presentation layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureConstraints;
use crate::encoder::EncoderSettings;
use crate::media::ObjectRef;

/// Lifecycle phase of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Nothing recorded, nothing held
    Idle,
    /// Waiting for the capture-access request to resolve
    Requesting,
    /// Capturing and encoding
    Recording,
    /// A finished recording is (or is about to be) available
    Stopped,
    /// Playing the finished clip
    Playing,
    /// Playback paused mid-clip
    PausedPlayback,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

/// A finished, merged recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Reference to the clip's backing memory object
    pub object: ObjectRef,

    /// Total length of the merged bytes
    pub len: usize,

    /// When the recording finished
    pub created_at: DateTime<Utc>,
}

/// Configuration for a session controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Auto-stop bound in displayed seconds. A value of zero or below
    /// disables the auto-stop entirely; the recording then runs until
    /// stopped explicitly.
    pub max_duration_secs: i64,

    /// Encoding format and bitrate
    pub encoding: EncoderSettings,

    /// Period between encoder chunk emissions, in milliseconds
    pub chunk_period_ms: u64,

    /// Period of the elapsed-time timer, in milliseconds
    pub tick_period_ms: u64,

    /// Constraints for the capture-access request
    pub constraints: CaptureConstraints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration_secs: 300,
            encoding: EncoderSettings::default(),
            chunk_period_ms: 1000,
            tick_period_ms: 1000,
            constraints: CaptureConstraints::default(),
        }
    }
}

impl SessionConfig {
    /// Whether the timer should auto-stop at `elapsed` seconds.
    pub(crate) fn auto_stop_at(&self, elapsed: u32) -> bool {
        self.max_duration_secs > 0 && i64::from(elapsed) >= self.max_duration_secs
    }
}

/// Presentation-facing projection of the session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    /// True while capturing (Recording phase)
    pub is_recording: bool,

    /// True while the clip is audibly playing
    pub is_playing: bool,

    /// Whole seconds elapsed in the current/last recording
    pub elapsed_seconds: u32,

    /// Reference to the finished clip, if one exists
    pub clip: Option<ObjectRef>,
}
