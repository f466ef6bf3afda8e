#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The host translates its native input (DOM pointer events, window resize
//! notifications) into these types before pushing them into the engine.
//!
//! # Design Notes
//!
//! - Positions are container-relative CSS pixels, origin at top-left.
//! - `Buttons` mirrors the DOM `PointerEvent.buttons` bitmask so hosts can
//!   pass it through unchanged.

use bitflags::bitflags;

use crate::geometry::{Size, Vec2};

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize(Size),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost. Losing focus ends any
    /// drag in progress.
    Focus(bool),
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,

    /// Container-relative position.
    pub position: Vec2,

    /// Buttons held *after* this event was applied.
    pub buttons: Buttons,
}

impl PointerEvent {
    /// Create a pointer event with no buttons held.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Vec2::new(x, y),
            buttons: Buttons::NONE,
        }
    }

    /// Set the held buttons.
    #[must_use]
    pub const fn buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Primary button pressed at `(x, y)`.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down, x, y).buttons(Buttons::PRIMARY)
    }

    /// Pointer moved to `(x, y)` with `buttons` held.
    #[must_use]
    pub const fn moved(x: f64, y: f64, buttons: Buttons) -> Self {
        Self::new(PointerEventKind::Move, x, y).buttons(buttons)
    }

    /// Primary button released at `(x, y)`.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up, x, y)
    }

    /// Pointer left the container at `(x, y)`.
    #[must_use]
    pub const fn leave(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Leave, x, y)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// A button was pressed.
    Down,
    /// The pointer moved (with or without buttons held).
    Move,
    /// A button was released.
    Up,
    /// The pointer left the container.
    Leave,
    /// The platform cancelled the pointer stream (touch interrupted).
    Cancel,
}

bitflags! {
    /// Pointer buttons currently held, matching the DOM bitmask layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        /// No buttons.
        const NONE      = 0b0000_0000;
        /// Primary button (left mouse, touch contact, pen tip).
        const PRIMARY   = 0b0000_0001;
        /// Secondary button (right mouse, pen barrel).
        const SECONDARY = 0b0000_0010;
        /// Auxiliary button (middle mouse / wheel).
        const AUXILIARY = 0b0000_0100;
    }
}

impl Default for Buttons {
    fn default() -> Self {
        Self::NONE
    }
}
