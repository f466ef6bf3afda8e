#![forbid(unsafe_code)]

//! Join-all image preload progress.
//!
//! The host loads images asynchronously and reports each one back as
//! [`LoadOutcome::Loaded`] or [`LoadOutcome::Failed`]. Both count as
//! settled; a failed image simply leaves its cells on the placeholder.
//! Once every tracked image has settled the tracker is complete, and it
//! stays complete even if later resizes add new images.

use std::collections::HashMap;

use crate::pool::ImageRef;

/// How an image load finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

/// What [`PreloadTracker::settle`] did with a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleResult {
    /// First report for a tracked image.
    Counted,
    /// The image had already settled; nothing changed.
    Duplicate,
    /// The image is not tracked.
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Pending,
    Settled(LoadOutcome),
}

/// Counts settled images against the set of requested ones.
#[derive(Debug, Clone, Default)]
pub struct PreloadTracker {
    states: HashMap<ImageRef, LoadState>,
    settled: usize,
    failed: usize,
    ready: bool,
}

impl PreloadTracker {
    /// Track `images`, ignoring duplicates.
    #[must_use]
    pub fn new(images: impl IntoIterator<Item = ImageRef>) -> Self {
        let mut tracker = Self::default();
        tracker.track(images);
        tracker
    }

    /// Start tracking images not seen before. Returns the newly added ones
    /// in input order, which are the loads the host still has to start.
    pub fn track(&mut self, images: impl IntoIterator<Item = ImageRef>) -> Vec<ImageRef> {
        let mut added = Vec::new();
        for image in images {
            if !self.states.contains_key(&image) {
                self.states.insert(image.clone(), LoadState::Pending);
                added.push(image);
            }
        }
        self.refresh_ready();
        added
    }

    /// Record the outcome of a load. Repeated reports are ignored.
    pub fn settle(&mut self, image: &ImageRef, outcome: LoadOutcome) -> SettleResult {
        let Some(state) = self.states.get_mut(image) else {
            tracing::trace!(target: "folio.gallery", %image, "settle for untracked image");
            return SettleResult::Unknown;
        };
        if *state != LoadState::Pending {
            return SettleResult::Duplicate;
        }

        *state = LoadState::Settled(outcome);
        self.settled += 1;
        if outcome == LoadOutcome::Failed {
            self.failed += 1;
            tracing::warn!(target: "folio.gallery", %image, "image failed to load");
        }
        self.refresh_ready();
        SettleResult::Counted
    }

    /// Outcome for `image`, if it has settled.
    #[must_use]
    pub fn outcome(&self, image: &ImageRef) -> Option<LoadOutcome> {
        match self.states.get(image) {
            Some(LoadState::Settled(outcome)) => Some(*outcome),
            _ => None,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn settled(&self) -> usize {
        self.settled
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// `settled / total`, or 1.0 when nothing is tracked.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.states.is_empty() {
            return 1.0;
        }
        self.settled as f64 / self.states.len() as f64
    }

    /// True once every tracked image has settled. Never reverts.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.ready
    }

    fn refresh_ready(&mut self) {
        if !self.ready && self.settled == self.states.len() {
            self.ready = true;
            tracing::debug!(
                target: "folio.gallery",
                total = self.states.len(),
                failed = self.failed,
                "preload complete"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(names: &[&str]) -> Vec<ImageRef> {
        names.iter().map(|n| ImageRef::from(*n)).collect()
    }

    #[test]
    fn empty_is_complete() {
        let tracker = PreloadTracker::new(Vec::<ImageRef>::new());
        assert_eq!(tracker.total(), 0);
        assert!(tracker.is_complete());
        assert_eq!(tracker.fraction(), 1.0);
    }

    #[test]
    fn duplicates_tracked_once() {
        let tracker = PreloadTracker::new(images(&["a", "b", "a"]));
        assert_eq!(tracker.total(), 2);
    }

    #[test]
    fn fraction_counts_failures() {
        let set = images(&["a", "b", "c", "d"]);
        let mut tracker = PreloadTracker::new(set.clone());
        assert_eq!(tracker.settle(&set[0], LoadOutcome::Loaded), SettleResult::Counted);
        assert_eq!(tracker.settle(&set[1], LoadOutcome::Failed), SettleResult::Counted);
        assert!((tracker.fraction() - 0.5).abs() < f64::EPSILON);
        assert_eq!(tracker.failed(), 1);
        assert!(!tracker.is_complete());

        tracker.settle(&set[2], LoadOutcome::Loaded);
        tracker.settle(&set[3], LoadOutcome::Failed);
        assert!(tracker.is_complete());
        assert_eq!(tracker.outcome(&set[3]), Some(LoadOutcome::Failed));
    }

    #[test]
    fn repeated_settle_is_ignored() {
        let set = images(&["a", "b"]);
        let mut tracker = PreloadTracker::new(set.clone());
        tracker.settle(&set[0], LoadOutcome::Loaded);
        assert_eq!(tracker.settle(&set[0], LoadOutcome::Failed), SettleResult::Duplicate);
        assert_eq!(tracker.settled(), 1);
        assert_eq!(tracker.outcome(&set[0]), Some(LoadOutcome::Loaded));
    }

    #[test]
    fn unknown_image_ignored() {
        let mut tracker = PreloadTracker::new(images(&["a"]));
        let stranger = ImageRef::from("zzz");
        assert_eq!(tracker.settle(&stranger, LoadOutcome::Loaded), SettleResult::Unknown);
        assert_eq!(tracker.settled(), 0);
    }

    #[test]
    fn ready_never_reverts() {
        let set = images(&["a"]);
        let mut tracker = PreloadTracker::new(set.clone());
        tracker.settle(&set[0], LoadOutcome::Loaded);
        assert!(tracker.is_complete());

        let added = tracker.track(images(&["a", "b"]));
        assert_eq!(added, images(&["b"]));
        assert!(tracker.is_complete());
        assert!((tracker.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
