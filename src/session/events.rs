//! Internal session events
//!
//! Everything asynchronous the controller reacts to arrives as one event
//! enum: timer ticks, encoder output, the encoder's terminal stop, and
//! playback reaching the end. Capability implementations deliver events
//! through an [`EventSink`] handed to them when they are started; each sink
//! is tagged with the epoch of the session that created it, so events from a
//! torn-down session can be recognized and dropped as stale.

use tokio::sync::mpsc;

/// An asynchronous happening the state machine reacts to
#[derive(Debug)]
pub enum SessionEvent {
    /// One period of the elapsed-time timer passed.
    TimerTick,

    /// The encoder emitted an incremental chunk of encoded bytes.
    EncoderChunk(Vec<u8>),

    /// The encoder finished flushing after `stop()`. Emitted exactly once.
    EncoderStopped,

    /// The playback sink reached the end of the clip.
    PlaybackEnded,
}

/// An event tagged with the epoch of the session that produced it
#[derive(Debug)]
pub struct Envelope {
    pub epoch: u64,
    pub event: SessionEvent,
}

/// Sender half handed to capability implementations
///
/// Cloneable; emitting never blocks. Events emitted after the controller's
/// receiver is gone are silently discarded.
#[derive(Debug, Clone)]
pub struct EventSink {
    epoch: u64,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl EventSink {
    pub(crate) fn new(epoch: u64, tx: mpsc::UnboundedSender<Envelope>) -> Self {
        Self { epoch, tx }
    }

    /// Deliver an event into the session's queue.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(Envelope {
            epoch: self.epoch,
            event,
        });
    }
}
