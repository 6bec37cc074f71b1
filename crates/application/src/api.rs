//! Typed endpoint surface over the storefront API.
//!
//! Data endpoints go through the [`AuthenticatedClient`] so every call
//! benefits from bearer attachment and the refresh protocol. The token
//! endpoints (`token/`, `register/`) bypass it: a 401 from a wrong
//! password must surface as-is, never trigger a refresh cycle.

use std::sync::Arc;

use bazaar_domain::{
    ApiRequest, ApiResponse, Category, Credentials, Product, ProductId, ProductQuery,
    Registration, TokenPair, User, UserUpdate,
};
use tracing::warn;

use crate::auth::{AuthenticatedClient, classify};
use crate::ports::{ApiError, AuthEvents, CredentialStore, HttpClient};

/// Client for the storefront REST API.
pub struct ApiClient<H, C, E> {
    http: Arc<H>,
    credentials: Arc<C>,
    authed: AuthenticatedClient<H, C, E>,
}

impl<H, C, E> ApiClient<H, C, E>
where
    H: HttpClient,
    C: CredentialStore,
    E: AuthEvents,
{
    /// Creates a client over the given transport and stores.
    pub fn new(http: Arc<H>, credentials: Arc<C>, events: Arc<E>) -> Self {
        let authed =
            AuthenticatedClient::new(Arc::clone(&http), Arc::clone(&credentials), events);
        Self {
            http,
            credentials,
            authed,
        }
    }

    /// Lists products, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the payload does
    /// not decode.
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let request = ApiRequest::get("products/").with_query(query.to_pairs());
        decode(self.authed.send(request).await?)
    }

    /// Fetches a single product by id.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]; a 404 surfaces as
    /// [`ApiError::Status`] with status 404.
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let request = ApiRequest::get(format!("products/{id}/"));
        decode(self.authed.send(request).await?)
    }

    /// Lists product categories.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the payload does
    /// not decode.
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        decode(self.authed.send(ApiRequest::get("categories/")).await?)
    }

    /// Logs in and stores the issued token pair.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 401 for bad credentials;
    /// no refresh cycle runs for this endpoint.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::Setup(e.to_string()))?;
        let response = self.http.execute(ApiRequest::post("token/").with_json(body)).await?;
        let pair: TokenPair = decode(classify(response)?)?;

        if let Err(error) = self.credentials.store_pair(&pair).await {
            // Best-effort persistence: the session still works in memory.
            warn!(%error, "could not persist issued token pair");
        }
        Ok(pair)
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]; field validation problems surface as
    /// [`ApiError::Status`] with status 400 and the server's payload.
    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let body =
            serde_json::to_value(registration).map_err(|e| ApiError::Setup(e.to_string()))?;
        let response = self
            .http
            .execute(ApiRequest::post("register/").with_json(body))
            .await?;
        decode(classify(response)?)
    }

    /// Fetches the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]; an expired session surfaces as
    /// [`ApiError::AuthExpired`] after the refresh protocol has run.
    pub async fn me(&self) -> Result<User, ApiError> {
        decode(self.authed.send(ApiRequest::get("users/me/")).await?)
    }

    /// Updates the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the request fails or the payload does
    /// not decode.
    pub async fn update_me(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let body = serde_json::to_value(update).map_err(|e| ApiError::Setup(e.to_string()))?;
        let request = ApiRequest::patch("users/me/").with_json(body);
        decode(self.authed.send(request).await?)
    }
}

/// Decodes a successful response body into the requested type.
fn decode<T: serde::de::DeserializeOwned>(response: ApiResponse) -> Result<T, ApiError> {
    response.json().map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingAuthEvents, MemoryCredentialStore, RecordingHttpClient};
    use pretty_assertions::assert_eq;

    fn client_with(
        responses: Vec<Result<ApiResponse, ApiError>>,
    ) -> (
        ApiClient<RecordingHttpClient, MemoryCredentialStore, CountingAuthEvents>,
        Arc<RecordingHttpClient>,
        Arc<MemoryCredentialStore>,
        Arc<CountingAuthEvents>,
    ) {
        let http = Arc::new(RecordingHttpClient::with_responses(responses));
        let credentials = Arc::new(MemoryCredentialStore::new());
        let events = Arc::new(CountingAuthEvents::new());
        let client = ApiClient::new(
            Arc::clone(&http),
            Arc::clone(&credentials),
            Arc::clone(&events),
        );
        (client, http, credentials, events)
    }

    #[tokio::test]
    async fn test_products_decode_and_query() {
        let (client, http, _credentials, _events) = client_with(vec![Ok(ApiResponse::new(
            200,
            serde_json::json!([
                {"id": 1, "name": "Mug", "price": "4.50"},
                {"id": 2, "name": "Lamp", "price": "25.00"}
            ]),
        ))]);

        let query = ProductQuery {
            search: Some("m".to_owned()),
            ..ProductQuery::default()
        };
        let products = client.products(&query).await.expect("list");
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].name, "Lamp");

        let sent = http.requests();
        assert_eq!(sent[0].path, "products/");
        assert_eq!(sent[0].query, vec![("search".to_owned(), "m".to_owned())]);
    }

    #[tokio::test]
    async fn test_login_stores_pair() {
        let (client, http, credentials, _events) = client_with(vec![Ok(ApiResponse::new(
            200,
            serde_json::json!({"access": "a1", "refresh": "r1"}),
        ))]);

        let pair = client
            .login(&Credentials {
                username: "ada".to_owned(),
                password: "pw".to_owned(),
            })
            .await
            .expect("login");
        assert_eq!(pair.access, "a1");
        assert_eq!(
            credentials.access_token().await.expect("read"),
            Some("a1".to_owned())
        );

        // The login request itself carries no bearer.
        assert_eq!(http.requests()[0].bearer, None);
    }

    #[tokio::test]
    async fn test_login_failure_does_not_trigger_refresh() {
        let (client, http, _credentials, events) = client_with(vec![Ok(ApiResponse::new(
            401,
            serde_json::json!({"detail": "No active account found"}),
        ))]);

        let err = client
            .login(&Credentials {
                username: "ada".to_owned(),
                password: "wrong".to_owned(),
            })
            .await
            .expect_err("bad credentials");
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        // One request, no refresh call, no forced logout.
        assert_eq!(http.requests().len(), 1);
        assert_eq!(events.count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_a_decode_error() {
        let (client, _http, _credentials, _events) = client_with(vec![Ok(ApiResponse::new(
            200,
            serde_json::json!({"unexpected": true}),
        ))]);

        let err = client.me().await.expect_err("shape mismatch");
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
