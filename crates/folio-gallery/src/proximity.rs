#![forbid(unsafe_code)]

//! Cursor-proximity scaling.
//!
//! Cells near the cursor grow slightly. The target scale falls off linearly
//! from `1 + max_bump` at the cell center to exactly `1.0` at `radius`, and
//! each cell eases toward its target through its own spring.

use std::time::Duration;

use folio_core::Vec2;
use folio_core::animation::Spring;

use crate::config::ProximityConfig;

/// Target scale for a cell centered at `center`.
///
/// Returns exactly `1.0` when the cursor is absent, outside the radius, or
/// the radius is not positive. The distance check compares squared lengths
/// so cells far from the cursor never pay for a square root.
#[inline]
#[must_use]
pub fn raw_scale(cursor: Option<Vec2>, center: Vec2, radius: f64, max_bump: f64) -> f64 {
    let Some(cursor) = cursor else {
        return 1.0;
    };
    if !(radius > 0.0) {
        return 1.0;
    }
    let d2 = cursor.distance_squared(center);
    if d2 >= radius * radius {
        return 1.0;
    }
    1.0 + max_bump * (1.0 - d2.sqrt() / radius)
}

/// Proximity parameters bundled for the per-frame scale pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityEffect {
    pub radius: f64,
    pub max_bump: f64,
}

impl ProximityEffect {
    #[must_use]
    pub fn new(config: &ProximityConfig) -> Self {
        Self {
            radius: config.radius,
            max_bump: config.max_scale_bump,
        }
    }

    #[must_use]
    pub fn scale_at(&self, cursor: Option<Vec2>, center: Vec2) -> f64 {
        raw_scale(cursor, center, self.radius, self.max_bump)
    }
}

/// A cell's eased scale.
#[derive(Debug, Clone)]
pub struct ScaleTracker {
    spring: Spring,
}

impl ScaleTracker {
    /// A tracker resting at scale 1.0.
    #[must_use]
    pub fn new(config: &ProximityConfig) -> Self {
        Self {
            spring: config.scale_spring(),
        }
    }

    /// Point the spring at a new target scale.
    pub fn retarget(&mut self, target: f64) {
        self.spring.set_target(target);
    }

    pub fn tick(&mut self, dt: Duration) {
        self.spring.advance(dt);
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.spring.position()
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.spring.target()
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.spring.is_at_rest()
    }
}
