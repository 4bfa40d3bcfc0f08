//! Encoder capability
//!
//! Contract for the audio encoder a recording session drives. The concrete
//! codec is a host concern; the controller only opens an encoder on a
//! granted stream, starts chunked emission, and stops it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::CaptureStream;
use crate::session::events::EventSink;

/// Encoding parameters for one recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncoderSettings {
    /// Codec/container identifier, e.g. `audio/webm;codecs=opus`.
    pub format: String,

    /// Target bitrate in bits per second.
    pub bitrate: u32,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            format: "audio/webm;codecs=opus".to_string(),
            bitrate: 96_000,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum EncoderError {
    #[error("failed to open encoder: {0}")]
    OpenFailed(String),
}

/// A running encoder instance
///
/// While active it emits [`SessionEvent::EncoderChunk`] events through the
/// sink given to `start`. After `stop()` it flushes whatever it has
/// buffered — possibly emitting further chunk events — and then emits
/// exactly one [`SessionEvent::EncoderStopped`].
///
/// [`SessionEvent::EncoderChunk`]: crate::session::events::SessionEvent::EncoderChunk
/// [`SessionEvent::EncoderStopped`]: crate::session::events::SessionEvent::EncoderStopped
pub trait Encoder: Send {
    /// Begin chunked emission, one chunk roughly every `chunk_period`.
    fn start(&mut self, chunk_period: Duration, sink: EventSink);

    /// Request the asynchronous stop/flush. Returns immediately.
    fn stop(&mut self);
}

/// Opens encoder instances on granted capture streams
pub trait EncoderProvider: Send + Sync {
    fn open(
        &self,
        stream: &dyn CaptureStream,
        settings: &EncoderSettings,
    ) -> Result<Box<dyn Encoder>, EncoderError>;
}
