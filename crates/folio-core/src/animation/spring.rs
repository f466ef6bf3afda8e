#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) animation.
//!
//! Provides physically-based motion for gliding pans and hover scaling.
//! Based on the classical damped spring equation:
//!
//!   m·a = -stiffness × (position - target) - damping × velocity
//!
//! # Parameters
//!
//! - **stiffness** (k): Restoring force strength. Higher = faster response.
//! - **damping** (c): Velocity drag. Higher = less oscillation.
//!   - Underdamped (c < 2√(k·m)): oscillates past target before settling
//!   - Critically damped (c = 2√(k·m)): fastest convergence without overshoot
//!   - Overdamped (c > 2√(k·m)): slower convergence, no overshoot
//! - **mass** (m): Inertia. Default 1.0.
//! - **rest_threshold**: Position delta below which the spring may rest.
//! - **velocity_threshold**: Speed below which the spring may rest.
//!
//! # Integration
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms so that a
//! stalled frame (tab switch, debugger) cannot blow up the integration.
//!
//! # Invariants
//!
//! 1. `position()` is the raw, unclamped position; `value()` is clamped to
//!    [0.0, 1.0] for normalized use.
//! 2. A spring at rest does not move on `advance()` until `set_target()`
//!    or `reset()` wakes it.
//! 3. `set_target()` always records the new target; it wakes the spring
//!    only if the position is farther than `rest_threshold` from it.
//! 4. Stiffness and mass are always positive; damping is non-negative.

use std::time::Duration;

use super::Animation;
use crate::geometry::Vec2;

/// Maximum dt per integration step (4ms).
const MAX_STEP_SECS: f64 = 0.004;

const DEFAULT_REST_THRESHOLD: f64 = 0.001;

const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.01;

const MIN_STIFFNESS: f64 = 0.1;

const MIN_MASS: f64 = 0.001;

/// A damped harmonic oscillator producing physically-based motion.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use folio_core::animation::Spring;
///
/// let mut spring = Spring::new(0.0, 1.0)
///     .with_stiffness(400.0)
///     .with_damping(60.0);
///
/// for _ in 0..120 {
///     spring.advance(Duration::from_millis(16));
/// }
///
/// assert!((spring.position() - 1.0).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    stiffness: f64,
    damping: f64,
    mass: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`.
    ///
    /// Default parameters: stiffness = 170.0, damping = 26.0, mass = 1.0.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Create a spring already resting at `value`.
    #[must_use]
    pub fn settled(value: f64) -> Self {
        let mut spring = Self::new(value, value);
        spring.at_rest = true;
        spring
    }

    /// Set stiffness (builder pattern). Clamped to minimum 0.1.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Set damping (builder pattern). Clamped to minimum 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    /// Set mass (builder pattern). Clamped to minimum 0.001.
    #[must_use]
    pub fn with_mass(mut self, m: f64) -> Self {
        self.mass = m.max(MIN_MASS);
        self
    }

    /// Set rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    /// Set velocity threshold (builder pattern).
    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    /// Current position (unclamped).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    #[inline]
    #[must_use]
    pub fn damping(&self) -> f64 {
        self.damping
    }

    #[inline]
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Change the target. Wakes the spring if the position is not already
    /// within the rest threshold of it.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        if (self.position - target).abs() > self.rest_threshold {
            self.at_rest = false;
        }
    }

    /// Whether the spring has settled at the target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Single semi-implicit Euler step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let spring_force = -self.stiffness * displacement;
        let damping_force = -self.damping * self.velocity;
        let acceleration = (spring_force + damping_force) / self.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let pos_delta = (self.position - self.target).abs();
        let vel_abs = self.velocity.abs();
        if pos_delta < self.rest_threshold && vel_abs < self.velocity_threshold {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    /// Returns the spring position clamped to [0.0, 1.0].
    fn value(&self) -> f32 {
        (self.position as f32).clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = false;
    }
}

/// Two independent springs driving a 2D value.
///
/// Both axes share parameters. The pair is at rest only when both axes are.
#[derive(Debug, Clone)]
pub struct SpringVec {
    x: Spring,
    y: Spring,
}

impl SpringVec {
    /// A spring pair resting at `value`.
    #[must_use]
    pub fn settled(value: Vec2) -> Self {
        Self {
            x: Spring::settled(value.x),
            y: Spring::settled(value.y),
        }
    }

    /// Apply a configuration to both axes (builder pattern).
    #[must_use]
    pub fn configure(self, f: impl Fn(Spring) -> Spring) -> Self {
        Self {
            x: f(self.x),
            y: f(self.y),
        }
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x.position(), self.y.position())
    }

    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.x.velocity(), self.y.velocity())
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.x.advance(dt);
        self.y.advance(dt);
    }
}
