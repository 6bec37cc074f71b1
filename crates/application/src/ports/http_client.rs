//! HTTP transport port and the normalized error taxonomy.

use async_trait::async_trait;
use bazaar_domain::{ApiRequest, ApiResponse};
use thiserror::Error;

/// Normalized shape of every request failure reaching caller code.
///
/// The transport distinguishes whether a request was never dispatched
/// ([`ApiError::Setup`]), was sent without an answer coming back
/// ([`ApiError::Network`]), or was answered with an error status
/// ([`ApiError::Status`]). [`ApiError::AuthExpired`] is produced by the
/// authenticated client once the refresh protocol has run its course, and
/// [`ApiError::Decode`] marks a successful response whose payload did not
/// match the expected shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The server answered with an error status and (possibly structured)
    /// payload.
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error payload as returned by the server.
        body: serde_json::Value,
    },

    /// The request was sent but no response was received (timeout,
    /// connection loss, offline).
    #[error("no response received: {0}")]
    Network(String),

    /// The request could not be constructed or dispatched at all.
    #[error("request setup failed: {0}")]
    Setup(String),

    /// Authentication expired and could not be silently refreshed; a
    /// logout side effect has been triggered.
    #[error("authentication expired")]
    AuthExpired,

    /// The server answered successfully but the payload did not match the
    /// expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Port for executing HTTP requests against the storefront API.
///
/// Implementations resolve the request path against the configured base
/// URL, attach the JSON content type and optional bearer header, and
/// return [`ApiResponse`] for *any* HTTP status. Only transport-level
/// failures map to `Err`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the server's response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] when the request could not be built or
    /// dispatched, and [`ApiError::Network`] when no response came back.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}
