#![forbid(unsafe_code)]

//! Shuffled image assignment.
//!
//! The pool is a concatenation of independently shuffled copies ("blocks")
//! of the base image set, truncated to the cell count. Slot `i` of the
//! layout shows `pool[i]`.
//!
//! # Invariants
//!
//! 1. `len() == cell_count` whenever the base set is non-empty.
//! 2. Every complete block is a permutation of the base set, so no image
//!    repeats before every other image has appeared once.
//! 3. The pool is rebuilt only when the grid shape changes, never per frame.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::config::ImagePolicy;
use crate::wrap::floor_mod;

/// Reference to an image asset (path or URL). Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    #[must_use]
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ImageRef {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seedable randomness for pool shuffles.
#[derive(Debug, Clone)]
pub struct ShuffleSource {
    rng: SmallRng,
}

impl ShuffleSource {
    /// Deterministic source; equal seeds give equal pools.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise.
    #[must_use]
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Image references assigned to grid slots, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImagePool {
    entries: Vec<ImageRef>,
    block_len: usize,
}

impl ImagePool {
    /// Build a pool covering `cell_count` slots.
    ///
    /// An empty `base` yields an empty pool; every slot then renders its
    /// placeholder.
    #[must_use]
    pub fn build(base: &[ImageRef], cell_count: usize, source: &mut ShuffleSource) -> Self {
        if base.is_empty() || cell_count == 0 {
            return Self {
                entries: Vec::new(),
                block_len: base.len(),
            };
        }

        let blocks = cell_count.div_ceil(base.len());
        let mut entries = Vec::with_capacity(blocks * base.len());
        for _ in 0..blocks {
            let mut block = base.to_vec();
            source.shuffle(&mut block);
            entries.extend(block);
        }
        entries.truncate(cell_count);

        tracing::debug!(
            target: "folio.gallery",
            base = base.len(),
            cells = cell_count,
            blocks,
            "image pool built"
        );

        Self {
            entries,
            block_len: base.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[ImageRef] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ImageRef> {
        self.entries.get(index)
    }

    /// Size of one shuffled block (the base set size).
    #[must_use]
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// The shuffled blocks; the last one may be truncated.
    pub fn blocks(&self) -> impl Iterator<Item = &[ImageRef]> + '_ {
        self.entries.chunks(self.block_len.max(1))
    }

    /// Image shown by slot `index` after it has completed `laps` wraps.
    #[must_use]
    pub fn image_for(&self, index: usize, laps: i64, policy: ImagePolicy) -> Option<&ImageRef> {
        match policy {
            ImagePolicy::Fixed => self.entries.get(index),
            ImagePolicy::ShiftOnWrap => {
                if self.entries.is_empty() {
                    return None;
                }
                let len = self.entries.len() as i64;
                let shifted = floor_mod(index as i64 + laps, len);
                self.entries.get(shifted as usize)
            }
        }
    }

    /// Distinct images in first-appearance order.
    #[must_use]
    pub fn distinct(&self) -> Vec<ImageRef> {
        let mut seen = HashSet::with_capacity(self.block_len);
        self.entries
            .iter()
            .filter(|image| seen.insert(*image))
            .cloned()
            .collect()
    }
}
