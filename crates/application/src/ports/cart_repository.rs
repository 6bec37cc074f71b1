//! Cart persistence port
//!
//! The cart snapshot lives under a fixed key as `{ "items": [...] }`.
//! Reading is forgiving: a missing or unparseable snapshot loads as an
//! empty cart, never as a fatal error.

use async_trait::async_trait;
use bazaar_domain::Cart;
use thiserror::Error;

/// Errors that can occur during cart persistence operations.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing a snapshot.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting the cart snapshot.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Loads the persisted cart. Adapters return an empty cart when the
    /// snapshot is missing or corrupt.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backing store itself cannot be
    /// read; callers treat that as an empty cart too.
    async fn load(&self) -> Result<Cart, CartStoreError>;

    /// Overwrites the persisted snapshot with the given cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be serialized or written.
    async fn save(&self, cart: &Cart) -> Result<(), CartStoreError>;
}
