#![forbid(unsafe_code)]

//! Toroidal coordinate wrapping.
//!
//! A cell at grid position `base` (px) under pan `offset` is drawn at
//!
//! ```text
//! floor_mod(base + offset + stride, span) - stride
//! ```
//!
//! which lands in `[-stride, span - stride)`. The `+ stride / - stride` pair
//! parks one spare cell just before the leading edge so a cell is already in
//! place when the grid pans toward it.
//!
//! # Invariants
//!
//! 1. Floored modulo only: `floor_mod(-1, 5) == 4`. A truncating `%` would
//!    map negative offsets outside the range and open a seam.
//! 2. `wrap_axis(base, offset + span, ..) == wrap_axis(base, offset, ..)`.
//! 3. Pure: no state, no side effects.

use folio_core::Vec2;

/// Floored modulo for integers. Result has the sign of `m`, so for `m > 0`
/// it is in `[0, m)`. Returns 0 when `m == 0`.
#[inline]
#[must_use]
pub fn floor_mod(n: i64, m: i64) -> i64 {
    if m == 0 {
        return 0;
    }
    let r = n % m;
    if r != 0 && ((r < 0) != (m < 0)) { r + m } else { r }
}

/// Floored modulo for `f64` with `m > 0`, guaranteed to be in `[0, m)`.
///
/// `rem_euclid` can round up to exactly `m` for tiny negative inputs; that
/// value is folded back to 0.
#[inline]
#[must_use]
pub fn floor_mod_f64(n: f64, m: f64) -> f64 {
    let r = n.rem_euclid(m);
    if r >= m { 0.0 } else { r }
}

/// Wrap one axis. See the module docs for the formula.
///
/// A non-positive or NaN `span` cannot wrap; the unwrapped `base + offset`
/// is returned.
#[inline]
#[must_use]
pub fn wrap_axis(base: f64, offset: f64, span: f64, stride: f64) -> f64 {
    if !(span > 0.0) {
        return base + offset;
    }
    floor_mod_f64(base + offset + stride, span) - stride
}

/// How many whole spans the cell has travelled on this axis.
///
/// Increments by one each time the cell jumps from the trailing edge back
/// to the leading edge, and decrements on the reverse jump. Derived from the
/// same remainder as [`wrap_axis`], so the lap changes exactly when the
/// position jumps.
#[inline]
#[must_use]
pub fn wrap_laps(base: f64, offset: f64, span: f64, stride: f64) -> i64 {
    if !(span > 0.0) {
        return 0;
    }
    let unwrapped = base + offset + stride;
    ((unwrapped - floor_mod_f64(unwrapped, span)) / span).round() as i64
}

/// The grid's wrap space: total pixel span on each axis and the cell stride.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapSpace {
    pub span: Vec2,
    pub stride: f64,
}

impl WrapSpace {
    #[must_use]
    pub const fn new(span: Vec2, stride: f64) -> Self {
        Self { span, stride }
    }

    /// Screen position of a cell whose unwrapped origin is `base`.
    #[inline]
    #[must_use]
    pub fn wrap(&self, base: Vec2, offset: Vec2) -> Vec2 {
        Vec2::new(
            wrap_axis(base.x, offset.x, self.span.x, self.stride),
            wrap_axis(base.y, offset.y, self.span.y, self.stride),
        )
    }

    /// Horizontal plus vertical laps completed by the cell.
    #[inline]
    #[must_use]
    pub fn laps(&self, base: Vec2, offset: Vec2) -> i64 {
        wrap_laps(base.x, offset.x, self.span.x, self.stride)
            + wrap_laps(base.y, offset.y, self.span.y, self.stride)
    }
}
