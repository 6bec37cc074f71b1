//! Authenticated request handling.
//!
//! [`AuthenticatedClient`] wraps the HTTP transport port with bearer
//! attachment and the silent refresh-and-retry protocol described by
//! [`RequestPhase`].

mod client;

pub use client::{AuthenticatedClient, RequestPhase};
pub(crate) use client::classify;
