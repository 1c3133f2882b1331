//! Carousel index bookkeeping.

use std::fmt;

use card_core::config::MAX_ITEMS_PER_VIEW;
use serde::Serialize;

/// Position of a carousel over its card set.
///
/// `current_index` is the first visible card. It always lies in
/// `0..=max(0, total - items_per_view)` and only changes through
/// [`CarouselState::go_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarouselState {
    current_index: usize,
    total: usize,
    items_per_view: usize,
}

impl CarouselState {
    /// Create a state at index 0.
    pub fn new(total: usize, items_per_view: usize) -> Self {
        Self {
            current_index: 0,
            total: total.min(MAX_ITEMS_PER_VIEW),
            items_per_view: items_per_view.clamp(1, MAX_ITEMS_PER_VIEW),
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    /// Highest index navigation can land on.
    pub fn max_index(&self) -> usize {
        self.total.saturating_sub(self.items_per_view)
    }

    /// Resolve a requested index with the wrap rule.
    ///
    /// Negative indices wrap to the last page start, indices past the last
    /// page start wrap to 0. When there are fewer cards than slots every
    /// request resolves to 0.
    pub fn resolve(&self, index: isize) -> usize {
        let last_start = self.total as isize - self.items_per_view as isize;
        if index < 0 {
            last_start.max(0) as usize
        } else if index > last_start {
            0
        } else {
            index as usize
        }
    }

    /// Move to `index` (after wrapping) and return the resolved index.
    pub fn go_to(&mut self, index: isize) -> usize {
        self.current_index = self.resolve(index);
        self.current_index
    }

    /// Index requested by a page step forward.
    pub fn next_target(&self) -> isize {
        (self.current_index as isize).saturating_add(self.items_per_view as isize)
    }

    /// Index requested by a page step backward.
    pub fn prev_target(&self) -> isize {
        (self.current_index as isize).saturating_sub(self.items_per_view as isize)
    }

    /// Width of one card slot in percent of the viewport.
    pub fn slot_width(&self) -> SlotWidth {
        SlotWidth(100.0 / self.items_per_view as f64)
    }

    /// Track shift for the current index.
    pub fn offset(&self) -> TrackOffset {
        TrackOffset::for_index(self.slot_width(), self.current_index)
    }
}

/// Width of a card slot, in percent of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct SlotWidth(f64);

impl SlotWidth {
    pub fn percent(&self) -> f64 {
        self.0
    }

    /// Inline style that pins a card to this width.
    pub fn css(&self) -> String {
        format!("flex: 0 0 {w}%; max-width: {w}%", w = self.0)
    }
}

/// Horizontal shift of the card track, in percent. Negative moves the
/// content left.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct TrackOffset(f64);

impl TrackOffset {
    /// Offset that brings the card at `index` to the left edge.
    pub fn for_index(slot: SlotWidth, index: usize) -> Self {
        let percent = -(slot.percent() * index as f64);
        // -0.0 at index 0
        Self(if percent == 0.0 { 0.0 } else { percent })
    }

    pub fn percent(&self) -> f64 {
        self.0
    }

    /// CSS transform value for the track.
    pub fn css_transform(&self) -> String {
        format!("translateX({}%)", self.0)
    }
}

impl fmt::Display for TrackOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
