#![forbid(unsafe_code)]

//! Slide and grow motion for the player card.
//!
//! Collapsed, the card is parked 180px off its anchor with only the album
//! art peeking out; expanded it sits flush and doubles in height. Both
//! properties move on the same 300/30 spring. On mount the card slides in
//! from 200px.

use std::time::Duration;

use folio_core::animation::Spring;

const STIFFNESS: f64 = 300.0;
const DAMPING: f64 = 30.0;
const REST_PX: f64 = 0.5;
const REST_SPEED: f64 = 1.0;

pub const MOUNT_OFFSET: f64 = 200.0;
pub const COLLAPSED_OFFSET: f64 = 180.0;
pub const EXPANDED_OFFSET: f64 = 0.0;
pub const COLLAPSED_HEIGHT: f64 = 60.0;
pub const EXPANDED_HEIGHT: f64 = 120.0;

fn panel_spring(from: f64, to: f64) -> Spring {
    Spring::new(from, to)
        .with_stiffness(STIFFNESS)
        .with_damping(DAMPING)
        .with_rest_threshold(REST_PX)
        .with_velocity_threshold(REST_SPEED)
}

#[derive(Debug, Clone)]
pub struct PanelMotion {
    offset: Spring,
    height: Spring,
}

impl Default for PanelMotion {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelMotion {
    /// Collapsed panel, sliding in from the mount offset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: panel_spring(MOUNT_OFFSET, COLLAPSED_OFFSET),
            height: panel_spring(COLLAPSED_HEIGHT, COLLAPSED_HEIGHT),
        }
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        if expanded {
            self.offset.set_target(EXPANDED_OFFSET);
            self.height.set_target(EXPANDED_HEIGHT);
        } else {
            self.offset.set_target(COLLAPSED_OFFSET);
            self.height.set_target(COLLAPSED_HEIGHT);
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.offset.advance(dt);
        self.height.advance(dt);
    }

    /// Horizontal offset from the anchor in px.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset.position()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height.position()
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.offset.is_at_rest() && self.height.is_at_rest()
    }
}
