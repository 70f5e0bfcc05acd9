//! Market health error types
//!
//! Scorers never fail. These errors belong to the boundaries around them:
//! window parsing, book ordering checks, comparison sets and identifiers.

use crate::types::BookSide;
use thiserror::Error;

/// Errors raised at the edges of the scoring engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketHealthError {
    /// Volatility window is not a positive number of hours
    #[error("Invalid volatility window: {0}")]
    InvalidWindow(String),

    /// Window is valid but not permitted by the configured policy
    #[error("Volatility window {window} is not allowed: {reason}")]
    WindowNotAllowed { window: String, reason: String },

    /// One side of the book is not ordered best-first
    #[error("Order book {side} side is not sorted best-first")]
    UnsortedBook { side: BookSide },

    /// Comparison needs between 2 and 5 markets
    #[error("Provide between {min} and {max} markets to compare, got {count}")]
    InvalidComparison { count: usize, min: usize, max: usize },

    /// Identifier is not `0x` + 64 hex characters
    #[error("Invalid market id: {0}")]
    InvalidMarketId(String),
}
