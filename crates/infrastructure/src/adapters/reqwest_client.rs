//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It owns URL assembly
//! against the configured base, timeouts, and header handling; status
//! classification stays in the application layer, so any HTTP status
//! comes back as a successful transport result.

use std::time::Duration;

use async_trait::async_trait;
use bazaar_application::ports::{ApiError, HttpClient};
use bazaar_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method, Url};
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("Bazaar/", env!("CARGO_PKG_VERSION"));

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
}

impl ReqwestHttpClient {
    /// Creates a transport against the given base URL.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the underlying client cannot be
    /// built.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Joins a relative path onto the base URL.
    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Setup(format!("invalid request path '{path}': {e}")))
    }

    /// Maps reqwest failures onto the transport error taxonomy: request
    /// construction problems are setup errors, everything else reached
    /// (or failed to reach) the network.
    fn map_error(error: &reqwest::Error) -> ApiError {
        if error.is_builder() {
            ApiError::Setup(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.resolve(&request.path)?;
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        // Empty or non-JSON bodies (204s, HTML error pages) become Null
        // rather than a transport failure.
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        debug!(%status, "received response");
        Ok(ApiResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8000/api/").expect("valid url")
    }

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestHttpClient::new(base()).is_ok());
    }

    #[test]
    fn test_relative_paths_join_under_base() {
        let client = ReqwestHttpClient::new(base()).expect("client");
        let url = client.resolve("products/3/").expect("resolves");
        assert_eq!(url.as_str(), "http://localhost:8000/api/products/3/");
    }
}
