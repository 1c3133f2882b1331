//! Registration pass over host containers.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use card_core::ContainerAttributes;
use serde::Serialize;

use crate::controller::{Abstention, CarouselController, Move};
use crate::host::{HostContainer, HostEvent};

/// Identifier of a mounted carousel within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CarouselId(usize);

impl CarouselId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CarouselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "carousel-{}", self.0)
    }
}

/// Why a container did not get a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The container is a plain grid.
    NotSlider,
    /// The container asked for a slider but lacks the structure for one.
    Abstained(Abstention),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotSlider => write!(f, "not a slider"),
            SkipReason::Abstained(reason) => write!(f, "{}", reason),
        }
    }
}

/// Outcome of registering one container, in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Registration {
    Mounted(CarouselId),
    Skipped(SkipReason),
}

impl Registration {
    pub fn id(&self) -> Option<CarouselId> {
        match self {
            Registration::Mounted(id) => Some(*id),
            Registration::Skipped(_) => None,
        }
    }
}

/// Independent carousels, one per mounted container.
///
/// Controllers share nothing; the registry only routes events and timer
/// polls to the right one.
#[derive(Debug)]
pub struct CarouselRegistry<H> {
    controllers: BTreeMap<CarouselId, CarouselController<H>>,
    next_id: usize,
}

impl<H: HostContainer> CarouselRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            controllers: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Mount a carousel on every slider container in `hosts`.
    ///
    /// Returns one outcome per host, in the order given.
    pub fn register(&mut self, hosts: impl IntoIterator<Item = H>, now: Instant) -> Vec<Registration> {
        let outcomes: Vec<Registration> = hosts
            .into_iter()
            .map(|host| match self.register_one(host, now) {
                Ok(id) => Registration::Mounted(id),
                Err(reason) => Registration::Skipped(reason),
            })
            .collect();

        let mounted = outcomes.iter().filter(|o| o.id().is_some()).count();
        tracing::info!(
            containers = outcomes.len(),
            mounted,
            skipped = outcomes.len() - mounted,
            "carousel registration complete"
        );
        outcomes
    }

    /// Mount a carousel on a single container.
    pub fn register_one(&mut self, host: H, now: Instant) -> Result<CarouselId, SkipReason> {
        let attributes = ContainerAttributes::read(&host);
        if !attributes.slider {
            return Err(SkipReason::NotSlider);
        }

        let id = CarouselId(self.next_id);
        let _span = tracing::debug_span!("carousel", %id).entered();

        match CarouselController::mount(host, attributes.viewport(), now) {
            Ok(controller) => {
                self.next_id += 1;
                self.controllers.insert(id, controller);
                Ok(id)
            }
            Err(reason) => {
                tracing::debug!(%reason, "container left as static grid");
                Err(SkipReason::Abstained(reason))
            }
        }
    }

    /// Deliver a host event to one carousel.
    pub fn dispatch(&mut self, id: CarouselId, event: HostEvent, now: Instant) -> Option<Move> {
        let Some(controller) = self.controllers.get_mut(&id) else {
            tracing::debug!(%id, event = event.as_str(), "event for unknown carousel");
            return None;
        };
        let _span = tracing::debug_span!("carousel", %id).entered();
        controller.handle(event, now)
    }

    /// Fire every autoplay tick due at `now`, across all carousels.
    pub fn poll(&mut self, now: Instant) -> Vec<(CarouselId, Move)> {
        let mut moves = Vec::new();
        for (id, controller) in &mut self.controllers {
            let _span = tracing::debug_span!("carousel", %id).entered();
            moves.extend(controller.poll(now).into_iter().map(|m| (*id, m)));
        }
        moves
    }

    /// Earliest pending autoplay tick.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controllers
            .values()
            .filter_map(CarouselController::next_deadline)
            .min()
    }

    pub fn get(&self, id: CarouselId) -> Option<&CarouselController<H>> {
        self.controllers.get(&id)
    }

    pub fn get_mut(&mut self, id: CarouselId) -> Option<&mut CarouselController<H>> {
        self.controllers.get_mut(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = CarouselId> + '_ {
        self.controllers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Tear down one carousel and return its container.
    pub fn teardown(&mut self, id: CarouselId) -> Option<H> {
        self.controllers.remove(&id).map(CarouselController::teardown)
    }

    /// Tear down every carousel.
    pub fn teardown_all(&mut self) -> Vec<(CarouselId, H)> {
        std::mem::take(&mut self.controllers)
            .into_iter()
            .map(|(id, controller)| (id, controller.teardown()))
            .collect()
    }
}

impl<H: HostContainer> Default for CarouselRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::MoveCause;
    use crate::host::VirtualContainer;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_register_mounts_sliders_only() {
        let t0 = Instant::now();
        let mut registry = CarouselRegistry::new();

        let outcomes = registry.register(
            vec![
                VirtualContainer::new(6).with_slider(3, 5000),
                VirtualContainer::new(6),
                VirtualContainer::without_track().with_slider(3, 5000),
                VirtualContainer::new(0).with_slider(3, 5000),
                VirtualContainer::new(4).with_slider(2, 2000),
            ],
            t0,
        );

        assert_eq!(outcomes[0], Registration::Mounted(CarouselId(0)));
        assert_eq!(outcomes[1], Registration::Skipped(SkipReason::NotSlider));
        assert_eq!(
            outcomes[2],
            Registration::Skipped(SkipReason::Abstained(Abstention::NoTrack))
        );
        assert_eq!(
            outcomes[3],
            Registration::Skipped(SkipReason::Abstained(Abstention::NoCards))
        );
        assert_eq!(outcomes[4], Registration::Mounted(CarouselId(1)));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_uses_attribute_defaults() {
        let t0 = Instant::now();
        let mut registry = CarouselRegistry::new();
        let host = VirtualContainer::new(9).with_attribute("data-dsi-slider", "true");
        let id = registry.register_one(host, t0).unwrap();

        let carousel = registry.get(id).unwrap();
        assert_eq!(carousel.config().items_per_view(), 3);
        assert_eq!(carousel.next_deadline(), Some(t0 + ms(5000)));
    }

    #[test]
    fn test_carousels_are_independent() {
        let t0 = Instant::now();
        let mut registry = CarouselRegistry::new();
        let ids: Vec<CarouselId> = registry
            .register(
                vec![
                    VirtualContainer::new(10).with_slider(3, 1000),
                    VirtualContainer::new(10).with_slider(3, 1000),
                ],
                t0,
            )
            .iter()
            .filter_map(Registration::id)
            .collect();

        registry.dispatch(ids[0], HostEvent::PointerEnter, t0 + ms(500));

        let moves = registry.poll(t0 + ms(1000));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].0, ids[1]);
        assert_eq!(moves[0].1.cause, MoveCause::Autoplay);
        assert_eq!(registry.get(ids[0]).unwrap().current_index(), 0);
        assert_eq!(registry.get(ids[1]).unwrap().current_index(), 3);
    }

    #[test]
    fn test_next_deadline_is_earliest() {
        let t0 = Instant::now();
        let mut registry = CarouselRegistry::new();
        registry.register(
            vec![
                VirtualContainer::new(10).with_slider(3, 4000),
                VirtualContainer::new(10).with_slider(3, 1500),
                VirtualContainer::new(10).with_slider(3, 0),
            ],
            t0,
        );
        assert_eq!(registry.next_deadline(), Some(t0 + ms(1500)));
    }

    #[test]
    fn test_dispatch_unknown_id() {
        let mut registry: CarouselRegistry<VirtualContainer> = CarouselRegistry::new();
        assert!(registry
            .dispatch(CarouselId(42), HostEvent::ActivateNext, Instant::now())
            .is_none());
    }

    #[test]
    fn test_teardown_cancels_and_returns_hosts() {
        let t0 = Instant::now();
        let mut registry = CarouselRegistry::new();
        let outcomes = registry.register(
            vec![
                VirtualContainer::new(10).with_slider(3, 1000),
                VirtualContainer::new(10).with_slider(3, 1000),
            ],
            t0,
        );
        let first = outcomes[0].id().unwrap();

        let host = registry.teardown(first).unwrap();
        assert_eq!(host.render_count(), 1);
        assert!(registry.get(first).is_none());
        assert!(registry.teardown(first).is_none());

        let rest = registry.teardown_all();
        assert_eq!(rest.len(), 1);
        assert!(registry.is_empty());
        assert_eq!(registry.next_deadline(), None);
        assert!(registry.poll(t0 + ms(10_000)).is_empty());
    }
}
