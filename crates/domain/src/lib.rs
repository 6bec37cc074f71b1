//! Bazaar Domain - Core storefront types
//!
//! This crate defines the domain model for the Bazaar storefront client.
//! All types here are pure Rust with no I/O dependencies: the cart reducer,
//! catalog and user records as the backend serializes them, credential
//! types, and the wire request/response shapes used by the HTTP ports.

pub mod auth;
pub mod cart;
pub mod error;
pub mod http;
pub mod product;
pub mod user;

pub use auth::{AccessClaims, Credentials, TokenPair};
pub use cart::{Cart, CartAction, CartLine, ProductInput};
pub use error::{DomainError, DomainResult};
pub use http::{ApiRequest, ApiResponse, HttpMethod};
pub use product::{Category, Product, ProductId, ProductQuery};
pub use user::{Registration, User, UserUpdate};
