//! Recording session controller
//!
//! Orchestrates one recording/playback lifecycle and owns every external
//! resource a session touches: the capture stream, the encoder instance,
//! the elapsed-time timer, and the clip's backing memory object. Commands
//! and asynchronous events all funnel into one locked state object, so the
//! presented state never diverges from what is physically held.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};

use super::events::{Envelope, EventSink, SessionEvent};
use super::state::{Clip, Phase, SessionConfig, SessionSnapshot};
use super::timer::{IntervalScheduler, TimerGuard};
use crate::capture::{CaptureProvider, CaptureStream};
use crate::encoder::{Encoder, EncoderProvider};
use crate::media::ObjectStore;
use crate::playback::PlaybackSink;
use crate::utils::error::{SessionError, SessionResult};

/// Lifecycle notifications broadcast to subscribers
#[derive(Debug, Clone)]
pub enum SessionNotice {
    /// A recording finished and was merged; carries the clip bytes.
    Saved(Vec<u8>),
    /// The session's recording/clip was deleted.
    Deleted,
    /// An incremental encoder chunk was appended.
    Chunk(Vec<u8>),
}

/// The external capabilities a controller composes
pub struct SessionCapabilities {
    pub capture: Arc<dyn CaptureProvider>,
    pub encoder: Arc<dyn EncoderProvider>,
    pub playback: Box<dyn PlaybackSink>,
    pub objects: Arc<dyn ObjectStore>,
    pub scheduler: Arc<dyn IntervalScheduler>,
}

/// Mutable session state, all behind one lock
struct Inner {
    phase: Phase,
    elapsed_seconds: u32,
    chunks: Vec<Vec<u8>>,
    clip: Option<Clip>,

    /// Bumped on every access attempt and every teardown; events tagged
    /// with an older epoch are stale and ignored.
    epoch: u64,

    stream: Option<Box<dyn CaptureStream>>,
    encoder: Option<Box<dyn Encoder>>,
    timer: Option<TimerGuard>,
    playback: Box<dyn PlaybackSink>,
    playback_bound: bool,

    closed: bool,
}

/// Controls one recording session
///
/// Shared by reference (`Arc`) between the host's command surface and the
/// event pump; all methods take `&self`.
pub struct SessionController {
    inner: Mutex<Inner>,
    config: SessionConfig,
    capture: Arc<dyn CaptureProvider>,
    encoder: Arc<dyn EncoderProvider>,
    objects: Arc<dyn ObjectStore>,
    scheduler: Arc<dyn IntervalScheduler>,
    events_tx: mpsc::UnboundedSender<Envelope>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<Envelope>>>,
    notice_tx: broadcast::Sender<SessionNotice>,
}

impl SessionController {
    /// Create an idle controller with the given capabilities.
    pub fn new(config: SessionConfig, caps: SessionCapabilities) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (notice_tx, _) = broadcast::channel(64);
        Self {
            inner: Mutex::new(Inner {
                phase: Phase::Idle,
                elapsed_seconds: 0,
                chunks: Vec::new(),
                clip: None,
                epoch: 0,
                stream: None,
                encoder: None,
                timer: None,
                playback: caps.playback,
                playback_bound: false,
                closed: false,
            }),
            config,
            capture: caps.capture,
            encoder: caps.encoder,
            objects: caps.objects,
            scheduler: caps.scheduler,
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            notice_tx,
        }
    }

    /// Subscribe to lifecycle notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotice> {
        self.notice_tx.subscribe()
    }

    /// Take the session's event queue, for hosts running their own loop.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<Envelope>> {
        self.events_rx.lock().take()
    }

    /// Spawn a task that dispatches queued events into the state machine.
    ///
    /// Runs until aborted; abort the handle when the hosting widget goes
    /// away (after calling [`close`](Self::close)).
    pub fn spawn_pump(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let controller = Arc::clone(self);
        let mut events = self
            .take_events()
            .expect("session event pump already running");
        tokio::spawn(async move {
            while let Some(envelope) = events.recv().await {
                controller.handle_event(envelope);
            }
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// Finished clip metadata, if one exists.
    pub fn clip(&self) -> Option<Clip> {
        self.inner.lock().clip.clone()
    }

    /// Presentation-facing projection of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock();
        SessionSnapshot {
            is_recording: inner.phase == Phase::Recording,
            is_playing: inner.phase == Phase::Playing,
            elapsed_seconds: inner.elapsed_seconds,
            clip: inner.clip.as_ref().map(|clip| clip.object),
        }
    }

    fn sink(&self, epoch: u64) -> EventSink {
        EventSink::new(epoch, self.events_tx.clone())
    }

    /// Start a new recording.
    ///
    /// The capture-access request is the sole suspension point; until it
    /// resolves the phase is `Requesting`. A delete or close that lands
    /// while the request is pending wins: the eventual grant is released
    /// immediately instead of becoming a live recording.
    pub async fn start_recording(&self) -> SessionResult<()> {
        let epoch = {
            let mut inner = self.inner.lock();
            if inner.closed {
                tracing::debug!("start_recording on a closed session, ignoring");
                return Ok(());
            }
            if inner.phase != Phase::Idle {
                return Err(SessionError::AlreadyActive);
            }
            inner.phase = Phase::Requesting;
            inner.epoch += 1;
            inner.epoch
        };

        tracing::info!("requesting capture access");
        let granted = self.capture.request_access(&self.config.constraints).await;

        let mut inner = self.inner.lock();
        if inner.epoch != epoch || inner.phase != Phase::Requesting {
            // Torn down while the request was pending.
            if let Ok(mut stream) = granted {
                tracing::info!("capture granted after teardown, releasing stream");
                stream.stop_all_tracks();
            }
            return Ok(());
        }

        let mut stream = match granted {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!("capture access refused: {err}");
                inner.phase = Phase::Idle;
                return Err(err.into());
            }
        };

        let mut encoder = match self.encoder.open(stream.as_ref(), &self.config.encoding) {
            Ok(encoder) => encoder,
            Err(err) => {
                // Partial setup rolls back: the stream must not outlive it.
                tracing::warn!("encoder open failed: {err}");
                stream.stop_all_tracks();
                inner.phase = Phase::Idle;
                return Err(SessionError::EncoderOpenFailed(err.to_string()));
            }
        };

        inner.chunks.clear();
        inner.elapsed_seconds = 0;
        encoder.start(
            Duration::from_millis(self.config.chunk_period_ms),
            self.sink(epoch),
        );
        inner.timer = Some(self.scheduler.schedule(
            Duration::from_millis(self.config.tick_period_ms),
            self.sink(epoch),
        ));
        inner.stream = Some(stream);
        inner.encoder = Some(encoder);
        inner.phase = Phase::Recording;

        tracing::info!("recording started");
        Ok(())
    }

    /// Stop the active recording.
    ///
    /// Releases the capture source and cancels the timer synchronously. The
    /// encoder flushes asynchronously; the clip becomes available (and
    /// [`SessionNotice::Saved`] fires) when its stop event arrives, slightly
    /// after the phase flips to `Stopped`.
    pub fn stop_recording(&self) {
        let mut inner = self.inner.lock();
        if inner.phase != Phase::Recording {
            return;
        }
        tracing::info!("stopping recording at {}s", inner.elapsed_seconds);
        Self::stop_capture(&mut inner);
        inner.phase = Phase::Stopped;
    }

    /// Stop encoder, capture source, and timer, in that order.
    fn stop_capture(inner: &mut Inner) {
        if let Some(mut encoder) = inner.encoder.take() {
            encoder.stop();
        }
        if let Some(mut stream) = inner.stream.take() {
            stream.stop_all_tracks();
        }
        if let Some(timer) = inner.timer.take() {
            timer.cancel();
        }
    }

    /// Toggle playback of the finished clip. No-op without a clip.
    pub fn toggle_playback(&self) {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Playing => {
                inner.playback.pause();
                inner.phase = Phase::PausedPlayback;
            }
            Phase::PausedPlayback => {
                inner.playback.play();
                inner.phase = Phase::Playing;
            }
            Phase::Stopped => {
                let Some(clip) = inner.clip.as_ref() else {
                    // Still waiting for the encoder to finish, or no clip.
                    return;
                };
                let Some(data) = self.objects.resolve(&clip.object) else {
                    tracing::warn!("clip object {} missing from store", clip.object);
                    return;
                };
                let sink = self.sink(inner.epoch);
                inner.playback.bind(data, sink);
                inner.playback_bound = true;
                inner.playback.play();
                inner.phase = Phase::Playing;
            }
            Phase::Idle | Phase::Requesting | Phase::Recording => {}
        }
    }

    /// Delete the current recording or clip, from any phase.
    ///
    /// Tears down whatever the current phase holds, revokes the clip's
    /// backing object exactly once, and returns the session to `Idle`.
    /// Calling again with nothing left to delete is a pure no-op.
    pub fn delete_recording(&self) {
        let mut inner = self.inner.lock();
        if !Self::teardown(&mut inner, self.objects.as_ref()) {
            tracing::debug!("delete_recording with nothing to delete");
            return;
        }
        tracing::info!("recording deleted");
        let _ = self.notice_tx.send(SessionNotice::Deleted);
    }

    /// Release everything the session holds, for host unmount.
    ///
    /// Unlike [`delete_recording`](Self::delete_recording) this does not
    /// notify, and the controller accepts no further recordings afterwards.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        if inner.closed {
            return;
        }
        inner.closed = true;
        Self::teardown(&mut inner, self.objects.as_ref());
        tracing::info!("session closed");
    }

    /// Full teardown in the required order: playback, capture/encoder,
    /// timer, backing object. Returns false when nothing was held.
    fn teardown(inner: &mut Inner, objects: &dyn ObjectStore) -> bool {
        let held_anything =
            inner.phase != Phase::Idle || inner.clip.is_some() || !inner.chunks.is_empty();
        if !held_anything {
            return false;
        }

        if inner.playback_bound {
            inner.playback.release();
            inner.playback_bound = false;
        }
        Self::stop_capture(inner);
        if let Some(clip) = inner.clip.take() {
            if let Err(err) = objects.revoke(&clip.object) {
                tracing::warn!("revoking clip object failed: {err}");
            }
        }
        inner.chunks.clear();
        inner.elapsed_seconds = 0;
        inner.phase = Phase::Idle;
        // Invalidate in-flight encoder/timer events and pending grants.
        inner.epoch += 1;
        true
    }

    /// Dispatch one queued event into the state machine.
    pub fn handle_event(&self, envelope: Envelope) {
        let mut inner = self.inner.lock();
        if envelope.epoch != inner.epoch {
            tracing::debug!(
                "dropping stale event {:?} (epoch {} != {})",
                envelope.event,
                envelope.epoch,
                inner.epoch
            );
            return;
        }

        match envelope.event {
            SessionEvent::TimerTick => {
                if inner.phase != Phase::Recording {
                    return;
                }
                inner.elapsed_seconds += 1;
                if self.config.auto_stop_at(inner.elapsed_seconds) {
                    tracing::info!(
                        "max duration of {}s reached, auto-stopping",
                        self.config.max_duration_secs
                    );
                    Self::stop_capture(&mut inner);
                    inner.phase = Phase::Stopped;
                }
            }
            SessionEvent::EncoderChunk(chunk) => {
                // Chunks are accepted while recording and during the flush
                // window between stop and the encoder's terminal event.
                let finalizing = inner.phase == Phase::Stopped && inner.clip.is_none();
                if inner.phase != Phase::Recording && !finalizing {
                    return;
                }
                if chunk.is_empty() {
                    return;
                }
                let _ = self.notice_tx.send(SessionNotice::Chunk(chunk.clone()));
                inner.chunks.push(chunk);
            }
            SessionEvent::EncoderStopped => {
                if inner.phase != Phase::Stopped || inner.clip.is_some() {
                    return;
                }
                let bytes: Vec<u8> = inner.chunks.drain(..).flatten().collect();
                let object = self.objects.create(bytes.clone());
                inner.clip = Some(Clip {
                    object,
                    len: bytes.len(),
                    created_at: Utc::now(),
                });
                tracing::info!("recording finished: {} bytes merged", bytes.len());
                let _ = self.notice_tx.send(SessionNotice::Saved(bytes));
            }
            SessionEvent::PlaybackEnded => {
                if inner.phase != Phase::Playing {
                    return;
                }
                inner.phase = Phase::Stopped;
            }
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.close();
    }
}
