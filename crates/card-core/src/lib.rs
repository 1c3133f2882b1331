//! Card records and viewport configuration for card grids.
//!
//! This crate holds the types shared between the card source and the
//! carousel engine:
//!
//! - **Cards**: `Card`, `CardSet`, badges and calls to action
//! - **Config**: `ViewportConfig` and container attribute parsing
//!
//! # Example
//!
//! ```rust
//! use card_core::prelude::*;
//!
//! let cards: CardSet = (1..=4)
//!     .map(|n| Card::product(format!("p-{n}"), format!("Product {n}"), format!("/p/{n}")))
//!     .collect();
//!
//! let viewport = ViewportConfig::new(3, 5000);
//! assert_eq!(cards.page_count(viewport.items_per_view()), 2);
//! ```

pub mod card;
pub mod config;
pub mod error;
pub mod ids;

pub use card::{Badge, CallToAction, Card, CardImage, CardKind, CardSet, CtaKind};
pub use config::{AttributeSource, ContainerAttributes, ViewportConfig};
pub use error::CardError;
pub use ids::*;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::card::{
        trim_words, Badge, CallToAction, Card, CardImage, CardKind, CardSet, CtaKind,
    };
    pub use crate::config::{AttributeSource, ContainerAttributes, ViewportConfig};
    pub use crate::error::CardError;
    pub use crate::ids::*;
}
