//! Card error types.

use thiserror::Error;

/// Errors raised when a card source hands over malformed records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    /// Card has no title.
    #[error("Card {0} has an empty title")]
    EmptyTitle(String),

    /// Card has no link target.
    #[error("Card {0} has an empty link")]
    EmptyLink(String),

    /// Two cards in one set share an id.
    #[error("Duplicate card id: {0}")]
    DuplicateCard(String),
}
