//! Bazaar Infrastructure - Adapters
//!
//! Concrete implementations of the application layer's ports: a reqwest
//! backed HTTP transport and file based stores for credentials and the
//! cart snapshot, plus the environment driven configuration they share.

pub mod adapters;
pub mod config;
pub mod persistence;

pub use adapters::ReqwestHttpClient;
pub use config::{Config, ConfigError};
pub use persistence::{FileCartRepository, FileCredentialStore};
