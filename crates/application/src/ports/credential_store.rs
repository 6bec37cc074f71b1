//! Credential storage port
//!
//! Defines the interface for persisting the access/refresh token pair.
//! Storage is two logical entries under fixed keys; a successful refresh
//! replaces the access token atomically with respect to readers on the
//! single-writer model.

use async_trait::async_trait;
use bazaar_domain::TokenPair;
use thiserror::Error;

/// Errors that can occur during credential storage operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting the credential pair.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored access token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn access_token(&self) -> Result<Option<String>, CredentialError>;

    /// Returns the stored refresh token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be read.
    async fn refresh_token(&self) -> Result<Option<String>, CredentialError>;

    /// Stores a full token pair, replacing both entries.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    async fn store_pair(&self, pair: &TokenPair) -> Result<(), CredentialError>;

    /// Replaces only the access token, keeping the refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    async fn store_access(&self, access: &str) -> Result<(), CredentialError>;

    /// Replaces only the refresh token (rotation), keeping the access
    /// token.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    async fn store_refresh(&self, refresh: &str) -> Result<(), CredentialError>;

    /// Removes both tokens.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store cannot be written.
    async fn clear(&self) -> Result<(), CredentialError>;
}
