//! Carousel engine for card grids.
//!
//! Pages a fixed, ordered set of cards through a viewport that shows
//! `items_per_view` cards at a time:
//! - `CarouselState` - Index bookkeeping and the wrap rule
//! - `Autoplay` - Stopped/running timer state machine
//! - `CarouselController` - One carousel bound to its host container
//! - `CarouselRegistry` - Registration pass over many containers
//! - `CarouselDriver` - Runs a registry on a tokio task
//!
//! The controller never reads the clock itself. Every operation that
//! depends on time takes `now`, so hosts, drivers and tests decide where
//! time comes from.

mod autoplay;
mod controller;
mod driver;
mod host;
mod registry;
mod state;

pub use autoplay::*;
pub use controller::*;
pub use driver::*;
pub use host::*;
pub use registry::*;
pub use state::*;
