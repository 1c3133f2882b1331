//! Carousel controller bound to one host container.

use std::time::Instant;

use card_core::ViewportConfig;
use serde::Serialize;
use thiserror::Error;

use crate::autoplay::Autoplay;
use crate::host::{Animation, HostContainer, HostEvent, NavControls};
use crate::state::{CarouselState, TrackOffset};

/// Why a container was left as a static grid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Abstention {
    #[error("container has no card track")]
    NoTrack,

    #[error("card track holds no cards")]
    NoCards,
}

/// What triggered a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCause {
    /// First paint at mount.
    Mount,
    /// Autoplay timer fired.
    Autoplay,
    /// Page step forward.
    Next,
    /// Page step backward.
    Prev,
    /// Direct jump.
    GoTo,
}

impl MoveCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCause::Mount => "mount",
            MoveCause::Autoplay => "autoplay",
            MoveCause::Next => "next",
            MoveCause::Prev => "prev",
            MoveCause::GoTo => "goto",
        }
    }
}

/// A rendered change of position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub offset: TrackOffset,
    pub cause: MoveCause,
}

/// Pages a host container's cards and runs its autoplay timer.
///
/// Every index change goes through one private render path, whether it
/// comes from a control, the timer, or a direct jump.
#[derive(Debug)]
pub struct CarouselController<H> {
    host: H,
    config: ViewportConfig,
    state: CarouselState,
    autoplay: Autoplay,
    controls: NavControls,
}

impl<H: HostContainer> CarouselController<H> {
    /// Mount a carousel on `host`.
    ///
    /// Sizes every card to one slot, paints index 0 without animation and
    /// starts autoplay when enabled. Containers without a track or without
    /// cards are left alone.
    pub fn mount(mut host: H, config: ViewportConfig, now: Instant) -> Result<Self, Abstention> {
        if !host.has_track() {
            return Err(Abstention::NoTrack);
        }
        let total = host.card_count();
        if total == 0 {
            return Err(Abstention::NoCards);
        }

        let state = CarouselState::new(total, config.items_per_view());
        let width = state.slot_width();
        for position in 0..total {
            host.set_card_width(position, width);
        }

        let controls = host.controls();
        let mut controller = Self {
            host,
            config,
            state,
            autoplay: Autoplay::new(config.autoplay_interval()),
            controls,
        };

        controller.render_to(0, MoveCause::Mount, Animation::None);
        if controller.autoplay.start(now) {
            tracing::debug!(
                interval_ms = config.autoplay_interval_ms(),
                "autoplay started"
            );
        }

        Ok(controller)
    }

    /// Jump to `index`, wrapping out-of-range requests.
    pub fn go_to(&mut self, index: isize) -> Move {
        self.render_to(index, MoveCause::GoTo, Animation::Slide)
    }

    /// Step forward one page.
    pub fn next(&mut self) -> Move {
        self.step_next(MoveCause::Next)
    }

    /// Step back one page.
    pub fn prev(&mut self) -> Move {
        self.render_to(self.state.prev_target(), MoveCause::Prev, Animation::Slide)
    }

    /// React to a host event.
    ///
    /// Hovering stops autoplay and leaving restarts it. Activating a
    /// control steps one page and restarts the countdown. Activation
    /// events for controls the container lacks are ignored.
    pub fn handle(&mut self, event: HostEvent, now: Instant) -> Option<Move> {
        if !self.controls.allows(event) {
            tracing::debug!(event = event.as_str(), "ignored event without control");
            return None;
        }

        match event {
            HostEvent::PointerEnter => {
                self.stop_autoplay();
                None
            }
            HostEvent::PointerLeave => {
                self.restart_autoplay(now);
                None
            }
            HostEvent::ActivatePrev => {
                let moved = self.prev();
                self.restart_autoplay(now);
                Some(moved)
            }
            HostEvent::ActivateNext => {
                let moved = self.next();
                self.restart_autoplay(now);
                Some(moved)
            }
        }
    }

    /// Fire every autoplay tick due at `now`.
    pub fn poll(&mut self, now: Instant) -> Vec<Move> {
        let mut moves = Vec::new();
        while self.autoplay.take_due(now) {
            moves.push(self.step_next(MoveCause::Autoplay));
        }
        moves
    }

    /// Start autoplay with a full interval from `now`.
    pub fn start_autoplay(&mut self, now: Instant) -> bool {
        let running = self.autoplay.start(now);
        if running {
            tracing::trace!("autoplay started");
        }
        running
    }

    /// Drop any pending tick and count a full interval from `now`.
    pub fn restart_autoplay(&mut self, now: Instant) -> bool {
        let running = self.autoplay.restart(now);
        if running {
            tracing::trace!("autoplay restarted");
        }
        running
    }

    /// Stop autoplay. Stopping twice is harmless.
    pub fn stop_autoplay(&mut self) {
        if self.autoplay.stop() {
            tracing::trace!("autoplay stopped");
        }
    }

    /// When the next autoplay tick is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.autoplay.next_due()
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    pub fn offset(&self) -> TrackOffset {
        self.state.offset()
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn autoplay(&self) -> &Autoplay {
        &self.autoplay
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Cancel autoplay and hand the container back.
    pub fn teardown(mut self) -> H {
        self.autoplay.stop();
        self.host
    }

    fn step_next(&mut self, cause: MoveCause) -> Move {
        self.render_to(self.state.next_target(), cause, Animation::Slide)
    }

    fn render_to(&mut self, index: isize, cause: MoveCause, animation: Animation) -> Move {
        let from = self.state.current_index();
        let to = self.state.go_to(index);
        let offset = self.state.offset();
        self.host.set_track_offset(offset, animation);

        tracing::debug!(from, to, offset = offset.percent(), cause = cause.as_str(), "carousel moved");

        Move {
            from,
            to,
            offset,
            cause,
        }
    }
}
