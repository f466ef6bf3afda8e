#![forbid(unsafe_code)]

//! `folio-web` drives the portfolio page engine from a host environment.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (JS glue, a native
//!   window, a test) pushes input and reports image/audio outcomes.
//! - **Deterministic time**: the host advances a monotonic clock explicitly
//!   through [`WebSession::step`].
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The session composes the gallery scene and the player widget, queues host
//! events between frames, and hands back one [`SessionFrame`] per step with
//! everything the host has to draw, load, or play.

#[cfg(feature = "input-parser")]
pub mod input_parser;
pub mod listeners;
pub mod session;

use core::time::Duration;

use folio_core::event::Event;
use folio_gallery::{ImageRef, LoadOutcome, Theme};
use folio_player::AudioEvent;

pub use listeners::{Listener, ListenerId, ListenerKind, ListenerRegistry};
pub use session::{SessionError, SessionFrame, Teardown, WebSession};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Clicks on the player widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    TogglePlay,
    Next,
    Previous,
    /// Click on the progress bar at this fraction of its width.
    Seek(f64),
    /// Jump to a playlist entry. Out-of-range indices are ignored.
    Select(usize),
    ToggleExpanded,
}

/// Everything the host can tell the session.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer, resize, or focus input.
    Input(Event),
    /// An image requested through [`SessionFrame::preload`] finished.
    ImageSettled { image: ImageRef, outcome: LoadOutcome },
    /// The surrounding page switched theme.
    Theme(Theme),
    /// Feedback from the audio element.
    Audio(AudioEvent),
    Player(PlayerAction),
}

impl From<Event> for HostEvent {
    fn from(event: Event) -> Self {
        Self::Input(event)
    }
}

impl From<AudioEvent> for HostEvent {
    fn from(event: AudioEvent) -> Self {
        Self::Audio(event)
    }
}

impl From<PlayerAction> for HostEvent {
    fn from(action: PlayerAction) -> Self {
        Self::Player(action)
    }
}
