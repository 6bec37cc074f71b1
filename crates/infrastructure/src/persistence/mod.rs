//! File based persistence adapters.
//!
//! Both stores keep one small JSON document per concern inside the
//! configured data directory: `tokens.json` for credentials and
//! `cart.json` for the cart snapshot.

mod cart_repository;
mod credential_store;

pub use cart_repository::FileCartRepository;
pub use credential_store::FileCredentialStore;
