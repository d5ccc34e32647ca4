//! Viewport signals reported by the rendering surface.
//!
//! The engine never measures anything itself; after every layout pass the
//! surface reports which item indices are visible and how many items exist,
//! the way a Jetpack Compose surface derives them from
//! `snapshotFlow { listState.layoutInfo }`.

/// Inclusive range of visible item indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleRange {
    /// Index of the first visible item.
    pub first: usize,
    /// Index of the last visible item.
    pub last: usize,
}

/// One layout pass report: what is visible, out of how many items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSignal {
    /// Visible index range, or `None` when the pass placed no items.
    pub visible: Option<VisibleRange>,
    /// Total number of items the surface is laying out.
    pub total_items: usize,
}

impl ViewportSignal {
    /// Signal with visible items from `first` to `last` (inclusive).
    pub fn of(first: usize, last: usize, total_items: usize) -> Self {
        debug_assert!(first <= last, "visible range reversed: {first}..={last}");
        Self {
            visible: Some(VisibleRange { first, last }),
            total_items,
        }
    }

    /// Signal for a pass that placed no items (empty list, zero-sized
    /// viewport).
    pub fn empty(total_items: usize) -> Self {
        Self {
            visible: None,
            total_items,
        }
    }

    /// Index of the last visible item, if any.
    #[inline]
    pub fn last_visible(&self) -> Option<usize> {
        self.visible.map(|range| range.last)
    }

    /// True when fewer than `threshold` unloaded items remain past the last
    /// visible one, meaning it is time to fetch the next batch.
    ///
    /// With a threshold of 5 and 100 items, index 94 still has 5 items ahead
    /// and does not trip the predicate; index 95 has 4 and does. A threshold
    /// of 0 never trips, which disables proximity prefetch. No visible items
    /// is never near the end.
    pub fn near_end(&self, threshold: usize) -> bool {
        match self.last_visible() {
            Some(last) => self.total_items.saturating_sub(last + 1) < threshold,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_end_boundary() {
        // 100 items, threshold 5: index 94 leaves 5 ahead, index 95 leaves 4.
        assert!(!ViewportSignal::of(90, 94, 100).near_end(5));
        assert!(ViewportSignal::of(90, 95, 100).near_end(5));
        assert!(ViewportSignal::of(95, 99, 100).near_end(5));
    }

    #[test]
    fn test_near_end_zero_threshold_never_fires() {
        assert!(!ViewportSignal::of(0, 99, 100).near_end(0));
        assert!(!ViewportSignal::of(0, 0, 1).near_end(0));
    }

    #[test]
    fn test_near_end_empty_viewport_is_false() {
        assert!(!ViewportSignal::empty(0).near_end(5));
        assert!(!ViewportSignal::empty(100).near_end(5));
    }

    #[test]
    fn test_near_end_short_list_fires_immediately() {
        // Everything visible and fewer items than the threshold.
        assert!(ViewportSignal::of(0, 2, 3).near_end(5));
        assert!(ViewportSignal::of(0, 0, 1).near_end(5));
    }

    #[test]
    fn test_last_visible() {
        assert_eq!(ViewportSignal::of(3, 9, 50).last_visible(), Some(9));
        assert_eq!(ViewportSignal::empty(50).last_visible(), None);
    }
}
