//! Recording session module
//!
//! This module implements the session lifecycle architecture:
//! - Phase machine and configuration in `state`
//! - One internal event enum, epoch-tagged, in `events`
//! - The repeating elapsed-time timer in `timer`
//! - SessionController to own the resources and drive transitions

pub mod controller;
pub mod events;
pub mod state;
pub mod timer;

pub use controller::{SessionCapabilities, SessionController, SessionNotice};
pub use events::{Envelope, EventSink, SessionEvent};
pub use state::{Clip, Phase, SessionConfig, SessionSnapshot};
pub use timer::{IntervalScheduler, TimerGuard, TokioScheduler};
