#![forbid(unsafe_code)]

//! Time-stepped animation primitives.
//!
//! Every animation is advanced explicitly by the host with a frame delta;
//! nothing here reads a clock. That keeps frames deterministic and lets
//! tests replay exact sequences.
//!
//! - [`Fade`]: fixed-duration 0→1 (or 1→0) transition with an easing curve.
//! - [`Spring`](spring::Spring): damped harmonic oscillator.
//! - [`SpringVec`](spring::SpringVec): a pair of springs for 2D values.

pub mod spring;

use std::time::Duration;

pub use spring::{Spring, SpringVec};

/// A value that evolves over time.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end state.
    fn is_complete(&self) -> bool;

    /// Current normalized value in `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}

/// Easing curve mapping linear progress `t ∈ [0, 1]` to eased progress.
pub type EasingFn = fn(f32) -> f32;

#[must_use]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

#[must_use]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

#[must_use]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Fixed-duration opacity-style transition.
///
/// `value()` runs from 0.0 to 1.0 over `duration`, shaped by the easing
/// curve. A [`reversed`](Fade::reversed) fade runs from 1.0 to 0.0.
///
/// # Invariants
///
/// 1. `value()` is always in `[0.0, 1.0]`.
/// 2. A zero duration completes on construction.
/// 3. Elapsed time saturates at `duration`.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    duration: Duration,
    elapsed: Duration,
    easing: EasingFn,
    reversed: bool,
}

impl Fade {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            easing: linear,
            reversed: false,
        }
    }

    /// Set the easing curve (builder pattern).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Run from 1.0 down to 0.0 (builder pattern).
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Linear progress through the duration, before easing.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        let eased = (self.easing)(self.progress()).clamp(0.0, 1.0);
        if self.reversed { 1.0 - eased } else { eased }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
