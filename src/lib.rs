//! Clipnote - Microphone clip recording sessions, made simple.
//!
//! One [`SessionController`] per recording widget: it turns user commands
//! (start, stop, toggle playback, delete) and asynchronous events (access
//! grants, encoder chunks, timer ticks, playback end) into one consistent,
//! leak-free session state. Capture, encoding, and playback are capability
//! traits supplied by the host; the controller owns their handles for
//! exactly as long as the lifecycle requires.

pub mod capture;
pub mod encoder;
pub mod media;
pub mod playback;
pub mod session;
pub mod utils;

pub use capture::{CaptureConstraints, CaptureError, CaptureProvider, CaptureStream};
pub use encoder::{Encoder, EncoderError, EncoderProvider, EncoderSettings};
pub use media::{MemoryObjectStore, ObjectError, ObjectRef, ObjectStore};
pub use playback::PlaybackSink;
pub use session::{
    Clip, Phase, SessionCapabilities, SessionConfig, SessionController, SessionNotice,
    SessionSnapshot, TokioScheduler,
};
pub use utils::error::{ErrorResponse, SessionError, SessionResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing for hosts that don't bring their own subscriber.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipnote=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
