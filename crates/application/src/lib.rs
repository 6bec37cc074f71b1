//! Bazaar Application - Use cases and ports
//!
//! This crate holds the storefront client's behavior: the authenticated
//! HTTP client with its single refresh-and-retry protocol, the write-through
//! cart service, the typed endpoint surface, and the session object that
//! wires them together. External systems (HTTP transport, credential and
//! cart persistence) are reached exclusively through the port traits in
//! [`ports`], so every piece here is testable with in-memory doubles.

pub mod api;
pub mod auth;
pub mod cart_service;
pub mod ports;
pub mod session;
pub mod testing;

pub use api::ApiClient;
pub use auth::{AuthenticatedClient, RequestPhase};
pub use cart_service::CartService;
pub use ports::{
    ApiError, AuthEvents, CartRepository, CartStoreError, CredentialError, CredentialStore,
    HttpClient,
};
pub use session::Session;
