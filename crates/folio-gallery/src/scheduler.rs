#![forbid(unsafe_code)]

//! Explicit per-frame pass scheduling.
//!
//! Each pass declares the inputs it reads as a [`Deps`] mask. Inputs mark
//! themselves dirty through [`FrameScheduler::invalidate`]; at the start of a
//! frame [`FrameScheduler::begin_frame`] returns every pass whose mask
//! intersects the dirty set, in registration order, and clears the set.
//!
//! Nothing runs implicitly: a pass whose inputs did not change is skipped.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Inputs a frame pass can depend on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Deps: u8 {
        /// Grid shape, cell list, or image pool changed.
        const LAYOUT = 0b0000_0001;
        /// Smoothed pan offset moved.
        const OFFSET = 0b0000_0010;
        /// Cursor moved, entered, or left.
        const CURSOR = 0b0000_0100;
    }
}

/// Handle to a registered pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(u16);

impl PassId {
    #[must_use]
    pub fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Pass {
    name: &'static str,
    deps: Deps,
}

/// Ordered set of passes plus the inputs dirtied since the last frame.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    passes: Vec<Pass>,
    dirty: Deps,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pass. Passes run in registration order.
    pub fn register(&mut self, name: &'static str, deps: Deps) -> PassId {
        let id = PassId(self.passes.len() as u16);
        self.passes.push(Pass { name, deps });
        id
    }

    /// Mark inputs as changed.
    pub fn invalidate(&mut self, deps: Deps) {
        self.dirty |= deps;
    }

    #[must_use]
    pub fn dirty(&self) -> Deps {
        self.dirty
    }

    /// Passes due this frame. Clears the dirty set.
    pub fn begin_frame(&mut self) -> Vec<PassId> {
        if self.dirty.is_empty() {
            return Vec::new();
        }
        let dirty = std::mem::take(&mut self.dirty);
        self.passes
            .iter()
            .enumerate()
            .filter(|(_, pass)| pass.deps.intersects(dirty))
            .map(|(i, _)| PassId(i as u16))
            .collect()
    }

    #[must_use]
    pub fn name(&self, id: PassId) -> Option<&'static str> {
        self.passes.get(usize::from(id.0)).map(|pass| pass.name)
    }

    #[must_use]
    pub fn deps(&self, id: PassId) -> Option<Deps> {
        self.passes.get(usize::from(id.0)).map(|pass| pass.deps)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}
