//! Playback-sink capability
//!
//! Contract for the audio output a finished clip is played through. The
//! controller binds the sink to a clip's resolved bytes before the first
//! play, drives play/pause, and releases the binding before the clip's
//! backing object is revoked.

use std::sync::Arc;

use crate::session::events::EventSink;

/// An audio output that can play one bound clip
///
/// When playback reaches the end of the bound data the sink emits exactly
/// one [`SessionEvent::PlaybackEnded`] through the sink given to `bind`.
///
/// [`SessionEvent::PlaybackEnded`]: crate::session::events::SessionEvent::PlaybackEnded
pub trait PlaybackSink: Send {
    /// Bind the sink to a clip's bytes. Replaces any previous binding.
    fn bind(&mut self, data: Arc<[u8]>, events: EventSink);

    /// Start or resume playback of the bound clip.
    fn play(&mut self);

    /// Pause playback, keeping the position.
    fn pause(&mut self);

    /// Stop playback and drop the binding. Safe to call when unbound.
    fn release(&mut self);
}
