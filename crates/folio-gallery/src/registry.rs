#![forbid(unsafe_code)]

//! Keyed cell registry.
//!
//! One [`CellEntry`] per layout slot, keyed by [`CellId`]. Reconciling
//! against a new layout reuses entries whose id still exists (equality is
//! on the id alone, so an entry survives even when its image changes),
//! mounts entries for new ids, and drops entries for ids that vanished.
//! Reused entries keep their scale spring, so a resize does not snap a
//! hovered cell back to 1.0.

use std::collections::HashMap;

use folio_core::Vec2;

use crate::config::ProximityConfig;
use crate::pool::{ImagePool, ImageRef};
use crate::proximity::ScaleTracker;
use crate::viewport::{CellId, CellSlot, GridLayout};

/// A mounted cell.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub id: CellId,
    pub rel_x: u32,
    pub rel_y: u32,
    /// Row-major slot index; also the pool index under the fixed policy.
    pub slot_index: usize,
    /// `None` renders the placeholder.
    pub image: Option<ImageRef>,
    pub scale: ScaleTracker,
    /// Wrapped top-left corner from the last position pass.
    pub position: Vec2,
    /// Wrap laps from the last position pass.
    pub laps: i64,
    instance: u64,
}

impl CellEntry {
    /// Mount counter value when this entry was created. Unchanged while
    /// the entry is reused.
    #[must_use]
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Unwrapped top-left corner in px.
    #[must_use]
    pub fn base(&self, stride: f64) -> Vec2 {
        Vec2::new(f64::from(self.rel_x) * stride, f64::from(self.rel_y) * stride)
    }

    fn apply_slot(&mut self, slot: &CellSlot, pool: &ImagePool) {
        self.rel_x = slot.rel_x;
        self.rel_y = slot.rel_y;
        self.slot_index = slot.index;
        self.image = pool.get(slot.index).cloned();
    }
}

/// Counts from one reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub reused: usize,
    pub created: usize,
    pub removed: usize,
}

/// All mounted cells in row-major order.
#[derive(Debug, Clone, Default)]
pub struct CellRegistry {
    entries: Vec<CellEntry>,
    next_instance: u64,
}

impl CellRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the mounted cells in line with `layout`.
    pub fn reconcile(
        &mut self,
        layout: &GridLayout,
        pool: &ImagePool,
        proximity: &ProximityConfig,
    ) -> ReconcileStats {
        let mut previous: HashMap<CellId, CellEntry> = self
            .entries
            .drain(..)
            .map(|entry| (entry.id, entry))
            .collect();

        let mut stats = ReconcileStats::default();
        let mut entries = Vec::with_capacity(layout.slots().len());
        for slot in layout.slots() {
            let entry = match previous.remove(&slot.id) {
                Some(mut entry) => {
                    stats.reused += 1;
                    entry.apply_slot(slot, pool);
                    entry
                }
                None => {
                    stats.created += 1;
                    let instance = self.next_instance;
                    self.next_instance += 1;
                    let mut entry = CellEntry {
                        id: slot.id,
                        rel_x: 0,
                        rel_y: 0,
                        slot_index: 0,
                        image: None,
                        scale: ScaleTracker::new(proximity),
                        position: slot.base(layout.stride()),
                        laps: 0,
                        instance,
                    };
                    entry.apply_slot(slot, pool);
                    entry
                }
            };
            entries.push(entry);
        }
        stats.removed = previous.len();
        self.entries = entries;

        tracing::debug!(
            target: "folio.gallery",
            reused = stats.reused,
            created = stats.created,
            removed = stats.removed,
            "cells reconciled"
        );
        stats
    }

    #[must_use]
    pub fn entries(&self) -> &[CellEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [CellEntry] {
        &mut self.entries
    }

    #[must_use]
    pub fn get(&self, id: CellId) -> Option<&CellEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::ShuffleSource;
    use crate::viewport::GridDims;

    fn pool_for(dims: GridDims, images: usize) -> ImagePool {
        let base: Vec<ImageRef> = (0..images)
            .map(|i| ImageRef::from(format!("{i}.jpg")))
            .collect();
        ImagePool::build(&base, dims.cell_count(), &mut ShuffleSource::seeded(11))
    }

    fn reconcile(registry: &mut CellRegistry, cols: u32, rows: u32) -> ReconcileStats {
        let dims = GridDims { cols, rows };
        let layout = GridLayout::new(dims, 100.0);
        registry.reconcile(&layout, &pool_for(dims, 5), &ProximityConfig::default())
    }

    #[test]
    fn initial_mount_creates_all() {
        let mut registry = CellRegistry::new();
        let stats = reconcile(&mut registry, 3, 2);
        assert_eq!(
            stats,
            ReconcileStats {
                reused: 0,
                created: 6,
                removed: 0
            }
        );
        assert!(registry.entries().iter().all(|e| e.image.is_some()));
    }

    #[test]
    fn grow_reuses_existing_ids() {
        let mut registry = CellRegistry::new();
        reconcile(&mut registry, 3, 2);
        let before = registry.get(CellId::new(1, 2)).unwrap().instance();

        let stats = reconcile(&mut registry, 4, 3);
        assert_eq!(stats.reused, 6);
        assert_eq!(stats.created, 6);
        assert_eq!(stats.removed, 0);
        assert_eq!(registry.get(CellId::new(1, 2)).unwrap().instance(), before);
    }

    #[test]
    fn shrink_drops_stale() {
        let mut registry = CellRegistry::new();
        reconcile(&mut registry, 4, 3);
        let stats = reconcile(&mut registry, 2, 2);
        assert_eq!(stats.removed, 8);
        assert_eq!(registry.len(), 4);
        assert!(registry.get(CellId::new(2, 3)).is_none());
    }

    #[test]
    fn reused_entry_takes_new_slot_index() {
        let mut registry = CellRegistry::new();
        reconcile(&mut registry, 3, 2);
        assert_eq!(registry.get(CellId::new(1, 0)).unwrap().slot_index, 3);
        reconcile(&mut registry, 4, 2);
        assert_eq!(registry.get(CellId::new(1, 0)).unwrap().slot_index, 4);
    }

    #[test]
    fn order_is_row_major() {
        let mut registry = CellRegistry::new();
        reconcile(&mut registry, 2, 2);
        reconcile(&mut registry, 3, 2);
        let ids: Vec<String> = registry.entries().iter().map(|e| e.id.to_string()).collect();
        assert_eq!(ids, ["0-0", "0-1", "0-2", "1-0", "1-1", "1-2"]);
    }

    #[test]
    fn empty_pool_gives_placeholders() {
        let mut registry = CellRegistry::new();
        let dims = GridDims { cols: 2, rows: 2 };
        let layout = GridLayout::new(dims, 100.0);
        registry.reconcile(&layout, &ImagePool::default(), &ProximityConfig::default());
        assert!(registry.entries().iter().all(|e| e.image.is_none()));
    }
}
