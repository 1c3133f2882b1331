//! Boundary between a carousel and the container it drives.

use std::collections::BTreeMap;

use card_core::config::{INTERVAL_ATTR, ITEMS_ATTR, SLIDER_ATTR};
use card_core::{AttributeSource, CardSet};

use crate::state::{SlotWidth, TrackOffset};

/// Events a host container delivers to its carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// Pointer entered the container.
    PointerEnter,
    /// Pointer left the container.
    PointerLeave,
    /// The "previous" control was activated.
    ActivatePrev,
    /// The "next" control was activated.
    ActivateNext,
}

impl HostEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostEvent::PointerEnter => "enter",
            HostEvent::PointerLeave => "leave",
            HostEvent::ActivatePrev => "prev",
            HostEvent::ActivateNext => "next",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "enter" | "pointerenter" | "hover" => Some(HostEvent::PointerEnter),
            "leave" | "pointerleave" => Some(HostEvent::PointerLeave),
            "prev" | "previous" => Some(HostEvent::ActivatePrev),
            "next" => Some(HostEvent::ActivateNext),
            _ => None,
        }
    }
}

/// Whether the track shift should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// Jump straight to the offset (first paint).
    None,
    /// Slide to the offset.
    Slide,
}

/// Navigation controls present in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavControls {
    pub prev: bool,
    pub next: bool,
}

impl NavControls {
    pub const NONE: Self = Self {
        prev: false,
        next: false,
    };
    pub const BOTH: Self = Self {
        prev: true,
        next: true,
    };

    /// Whether the control that raises `event` exists. Pointer events need
    /// no control.
    pub fn allows(&self, event: HostEvent) -> bool {
        match event {
            HostEvent::ActivatePrev => self.prev,
            HostEvent::ActivateNext => self.next,
            HostEvent::PointerEnter | HostEvent::PointerLeave => true,
        }
    }
}

/// A container a carousel can be mounted on.
///
/// The carousel only reads structure (track, card count, controls) and
/// writes presentation (card widths, track offset). Card content, count
/// and order are never touched.
pub trait HostContainer: AttributeSource {
    /// Whether the container has a card track.
    fn has_track(&self) -> bool;

    /// Number of cards directly inside the track.
    fn card_count(&self) -> usize;

    /// Navigation controls available in the container.
    fn controls(&self) -> NavControls;

    /// Pin the card at `position` to `width`.
    fn set_card_width(&mut self, position: usize, width: SlotWidth);

    /// Shift the track.
    fn set_track_offset(&mut self, offset: TrackOffset, animation: Animation);
}

/// In-memory host container.
///
/// Records every presentational write so callers can inspect what a
/// carousel rendered.
#[derive(Debug, Clone, Default)]
pub struct VirtualContainer {
    attributes: BTreeMap<String, String>,
    track: bool,
    card_widths: Vec<Option<SlotWidth>>,
    controls: NavControls,
    offset: Option<TrackOffset>,
    animation: Option<Animation>,
    renders: usize,
}

impl VirtualContainer {
    /// Container with a track of `card_count` cards and both controls.
    pub fn new(card_count: usize) -> Self {
        Self {
            track: true,
            card_widths: vec![None; card_count],
            controls: NavControls::BOTH,
            ..Self::default()
        }
    }

    /// Container holding one card per entry of `cards`.
    pub fn from_cards(cards: &CardSet) -> Self {
        Self::new(cards.len())
    }

    /// Container without a card track.
    pub fn without_track() -> Self {
        Self::default()
    }

    /// Set a raw attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replace all attributes.
    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Mark as a slider with the given page size and interval.
    pub fn with_slider(self, items_per_view: usize, interval_ms: u64) -> Self {
        self.with_attribute(SLIDER_ATTR, "true")
            .with_attribute(ITEMS_ATTR, items_per_view.to_string())
            .with_attribute(INTERVAL_ATTR, interval_ms.to_string())
    }

    pub fn with_controls(mut self, controls: NavControls) -> Self {
        self.controls = controls;
        self
    }

    /// Width assigned to the card at `position`.
    pub fn card_width(&self, position: usize) -> Option<SlotWidth> {
        self.card_widths.get(position).copied().flatten()
    }

    /// Last offset written to the track.
    pub fn offset(&self) -> Option<TrackOffset> {
        self.offset
    }

    /// Animation used for the last offset write.
    pub fn last_animation(&self) -> Option<Animation> {
        self.animation
    }

    /// Number of offset writes so far.
    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl AttributeSource for VirtualContainer {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.attribute(name)
    }
}

impl HostContainer for VirtualContainer {
    fn has_track(&self) -> bool {
        self.track
    }

    fn card_count(&self) -> usize {
        if self.track {
            self.card_widths.len()
        } else {
            0
        }
    }

    fn controls(&self) -> NavControls {
        self.controls
    }

    fn set_card_width(&mut self, position: usize, width: SlotWidth) {
        if let Some(slot) = self.card_widths.get_mut(position) {
            *slot = Some(width);
        }
    }

    fn set_track_offset(&mut self, offset: TrackOffset, animation: Animation) {
        self.offset = Some(offset);
        self.animation = Some(animation);
        self.renders += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_core::{Card, ContainerAttributes};

    #[test]
    fn test_event_names() {
        assert_eq!(HostEvent::from_str("Enter"), Some(HostEvent::PointerEnter));
        assert_eq!(HostEvent::from_str("previous"), Some(HostEvent::ActivatePrev));
        assert_eq!(HostEvent::from_str("click"), None);
        assert_eq!(HostEvent::ActivateNext.as_str(), "next");
    }

    #[test]
    fn test_controls_gate_activation_only() {
        let controls = NavControls {
            prev: false,
            next: true,
        };
        assert!(!controls.allows(HostEvent::ActivatePrev));
        assert!(controls.allows(HostEvent::ActivateNext));
        assert!(NavControls::NONE.allows(HostEvent::PointerLeave));
    }

    #[test]
    fn test_virtual_container_from_cards() {
        let cards: CardSet = (0..4)
            .map(|n| Card::post(format!("a-{n}"), "Title", "/a"))
            .collect();
        let host = VirtualContainer::from_cards(&cards).with_slider(2, 3000);

        assert!(host.has_track());
        assert_eq!(host.card_count(), 4);

        let attrs = ContainerAttributes::read(&host);
        assert!(attrs.slider);
        assert_eq!(attrs.items_per_view, 2);
        assert_eq!(attrs.autoplay_interval_ms, 3000);
    }

    #[test]
    fn test_virtual_container_without_track_has_no_cards() {
        let host = VirtualContainer::without_track();
        assert!(!host.has_track());
        assert_eq!(host.card_count(), 0);
        assert_eq!(host.controls(), NavControls::NONE);
    }

    #[test]
    fn test_virtual_container_records_writes() {
        let mut host = VirtualContainer::new(2);
        host.set_card_width(5, crate::state::CarouselState::new(2, 2).slot_width());
        assert_eq!(host.card_width(0), None);

        let state = crate::state::CarouselState::new(2, 2);
        host.set_card_width(1, state.slot_width());
        host.set_track_offset(state.offset(), Animation::None);

        assert_eq!(host.card_width(1).map(|w| w.percent()), Some(50.0));
        assert_eq!(host.offset().map(|o| o.percent()), Some(0.0));
        assert_eq!(host.last_animation(), Some(Animation::None));
        assert_eq!(host.render_count(), 1);
    }
}
