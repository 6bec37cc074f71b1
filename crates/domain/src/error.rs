//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A product offered to the cart is missing required fields or carries
    /// an unusable price. The cart state is left untouched.
    #[error("invalid product: {0}")]
    InvalidProduct(String),

    /// A price string could not be parsed as a non-negative decimal.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A bearer token is structurally malformed and its claims cannot be
    /// read.
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
