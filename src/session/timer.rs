//! Repeating elapsed-time timer
//!
//! The controller starts one timer per recording and cancels it when the
//! recording stops. Cancellation is synchronous: once `cancel` returns no
//! further tick is delivered from that guard.

use std::time::Duration;

use crate::session::events::{EventSink, SessionEvent};

/// Schedules repeating ticks into a session's event queue
pub trait IntervalScheduler: Send + Sync {
    fn schedule(&self, period: Duration, sink: EventSink) -> TimerGuard;
}

/// Handle to a scheduled timer; cancelling (or dropping) stops the ticks
pub struct TimerGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerGuard {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for TimerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Tokio-backed scheduler: one spawned task per recording, aborted on cancel
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl IntervalScheduler for TokioScheduler {
    fn schedule(&self, period: Duration, sink: EventSink) -> TimerGuard {
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                sink.emit(SessionEvent::TimerTick);
            }
        });

        TimerGuard::new(move || {
            tracing::debug!("cancelling elapsed-time timer");
            task.abort();
        })
    }
}
