#![forbid(unsafe_code)]

//! Pointer-driven panning with a momentum glide.
//!
//! # State Machine
//!
//! ```text
//!            move past threshold            release
//!   Idle ─────────────────────────► Dragging ─────────► Coasting
//!    ▲                                  ▲                  │
//!    │          springs at rest         │  grab + move     │
//!    └──────────────────────────────────┼──────────────────┘
//!                                       └──────────────────┘
//! ```
//!
//! The raw offset follows the pointer 1:1 while dragging. The smoothed
//! offset, which is what the grid draws, chases the raw offset through a
//! pair of overdamped springs, so it keeps gliding after release and comes
//! to rest without bouncing.
//!
//! # Invariants
//!
//! 1. The raw offset only ever changes by adding drag deltas; nothing resets
//!    it. Grabbing mid-glide continues from the current raw value.
//! 2. Once a press crosses the drag threshold, the raw offset moves by the
//!    full pointer displacement since the press, so content stays under the
//!    finger.
//! 3. `Coasting` ends only when both axis springs rest.
//! 4. Resizing the viewport never touches this controller.

use std::time::Duration;

use folio_core::Vec2;
use folio_core::animation::SpringVec;

use crate::config::PanConfig;

/// Phase of the pan interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanPhase {
    /// No drag, glide at rest.
    Idle,
    /// Pointer is held and moving the raw offset.
    Dragging,
    /// Released; the smoothed offset is still gliding toward the raw offset.
    Coasting,
}

/// An active press that may or may not have become a drag.
#[derive(Debug, Clone, Copy)]
struct Press {
    origin: Vec2,
    last: Vec2,
    panning: bool,
}

/// Accumulates drag deltas and glides the drawn offset toward them.
#[derive(Debug, Clone)]
pub struct PanController {
    raw: Vec2,
    smoothed: SpringVec,
    phase: PanPhase,
    press: Option<Press>,
    drag_threshold: f64,
}

impl PanController {
    #[must_use]
    pub fn new(config: &PanConfig) -> Self {
        let smoothed = SpringVec::settled(Vec2::ZERO).configure(|_| config.glide_spring());
        Self {
            raw: Vec2::ZERO,
            smoothed,
            phase: PanPhase::Idle,
            press: None,
            drag_threshold: config.drag_threshold.max(0.0),
        }
    }

    /// Cumulative drag distance since the session started.
    #[must_use]
    pub fn raw_offset(&self) -> Vec2 {
        self.raw
    }

    /// Spring-smoothed offset used for drawing.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.smoothed.position()
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.smoothed.velocity()
    }

    #[must_use]
    pub fn phase(&self) -> PanPhase {
        self.phase
    }

    /// Whether the smoothed offset has caught up with the raw offset. A
    /// pointer held still mid-drag is settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.smoothed.is_at_rest()
    }

    /// Whether a pointer is currently held on the grid.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Begin a press. Does not change the phase until the pointer moves.
    pub fn pointer_down(&mut self, position: Vec2) {
        self.press = Some(Press {
            origin: position,
            last: position,
            panning: false,
        });
    }

    /// Track pointer movement. Returns `true` if the raw offset changed.
    pub fn pointer_move(&mut self, position: Vec2) -> bool {
        let Some(mut press) = self.press else {
            return false;
        };

        let delta = if press.panning {
            position - press.last
        } else if (position - press.origin).manhattan() >= self.drag_threshold {
            press.panning = true;
            position - press.origin
        } else {
            press.last = position;
            self.press = Some(press);
            return false;
        };

        press.last = position;
        self.press = Some(press);
        self.drag_by(delta);
        true
    }

    /// End the press. A press that never became a drag leaves the phase
    /// alone.
    pub fn pointer_up(&mut self) {
        let Some(press) = self.press.take() else {
            return;
        };
        if press.panning && self.phase == PanPhase::Dragging {
            self.phase = if self.smoothed.is_at_rest() {
                PanPhase::Idle
            } else {
                PanPhase::Coasting
            };
            tracing::debug!(
                target: "folio.pan",
                raw_x = self.raw.x,
                raw_y = self.raw.y,
                phase = ?self.phase,
                "drag released"
            );
        }
    }

    /// Abort the press (focus loss, pointer cancel). Behaves like a release
    /// so the glide still finishes.
    pub fn cancel(&mut self) {
        self.pointer_up();
    }

    /// Add a drag delta directly onto the raw offset.
    ///
    /// Hosts whose gesture layer already reports pan deltas can call this
    /// instead of the pointer methods.
    pub fn drag_by(&mut self, delta: Vec2) {
        self.raw += delta;
        self.smoothed.set_target(self.raw);
        if self.phase != PanPhase::Dragging {
            tracing::trace!(target: "folio.pan", from = ?self.phase, "drag started");
        }
        self.phase = PanPhase::Dragging;
    }

    /// Advance the glide. Returns `true` if the smoothed offset moved.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let before = self.smoothed.position();
        self.smoothed.advance(dt);
        let moved = self.smoothed.position() != before;

        if self.phase == PanPhase::Coasting && self.smoothed.is_at_rest() {
            self.phase = PanPhase::Idle;
            tracing::debug!(
                target: "folio.pan",
                x = self.raw.x,
                y = self.raw.y,
                "glide settled"
            );
        }
        moved
    }
}
