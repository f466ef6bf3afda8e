#![forbid(unsafe_code)]

//! Bookkeeping for host listener registrations.
//!
//! The session never installs listeners itself; it records which ones the
//! host is expected to hold so that teardown can hand back the complete list
//! to remove. A registry that has been drained stays empty.

use std::fmt;

/// What a host listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerDown,
    PointerMove,
    PointerUp,
    PointerLeave,
    AnimationFrame,
    AudioLoadedMetadata,
    AudioTimeUpdate,
    AudioEnded,
}

impl ListenerKind {
    /// Listeners the gallery needs.
    pub const GALLERY: [Self; 6] = [
        Self::Resize,
        Self::PointerDown,
        Self::PointerMove,
        Self::PointerUp,
        Self::PointerLeave,
        Self::AnimationFrame,
    ];

    /// Listeners on the player's audio element.
    pub const AUDIO: [Self; 3] = [
        Self::AudioLoadedMetadata,
        Self::AudioTimeUpdate,
        Self::AudioEnded,
    ];

    /// DOM event name.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::PointerDown => "pointerdown",
            Self::PointerMove => "pointermove",
            Self::PointerUp => "pointerup",
            Self::PointerLeave => "pointerleave",
            Self::AnimationFrame => "animationframe",
            Self::AudioLoadedMetadata => "loadedmetadata",
            Self::AudioTimeUpdate => "timeupdate",
            Self::AudioEnded => "ended",
        }
    }
}

/// Opaque registration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

impl ListenerId {
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// An active registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub id: ListenerId,
    pub kind: ListenerKind,
}

#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    active: Vec<Listener>,
    next_id: u32,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.active.push(Listener { id, kind });
        tracing::trace!(target: "folio.web", %id, event = kind.event_name(), "listener registered");
        id
    }

    /// Remove one registration. Returns `false` if it was not active.
    pub fn deregister(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|listener| listener.id != id);
        self.active.len() != before
    }

    #[must_use]
    pub fn is_registered(&self, kind: ListenerKind) -> bool {
        self.active.iter().any(|listener| listener.kind == kind)
    }

    #[must_use]
    pub fn active(&self) -> &[Listener] {
        &self.active
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Remove and return every registration, oldest first.
    pub fn drain_all(&mut self) -> Vec<Listener> {
        std::mem::take(&mut self.active)
    }
}
