//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by an in-memory double in tests.

mod auth_events;
mod cart_repository;
mod credential_store;
mod http_client;

pub use auth_events::AuthEvents;
pub use cart_repository::{CartRepository, CartStoreError};
pub use credential_store::{CredentialError, CredentialStore};
pub use http_client::{ApiError, HttpClient};
