//! # Error Types
//!
//! Defines error types used across plugins.

use thiserror::Error;

/// Errors produced while parsing a coin list such as `"100:BNB,10:ABC"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinsParseError {
    /// Entry is not of the form `amount:denom`.
    #[error("Malformed coin '{0}', expected amount:denom")]
    MalformedCoin(String),

    /// Amount is not an integer.
    #[error("Invalid coin amount '{0}'")]
    InvalidAmount(String),
}
