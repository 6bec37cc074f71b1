//! Session wiring for the storefront client.
//!
//! [`Session`] is the composition root the binary builds once at startup:
//! it owns the typed API client, the cart service, and the cached access
//! claims, and keeps all three consistent across login and logout.

use std::sync::Arc;

use bazaar_domain::{AccessClaims, Credentials, TokenPair};
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::cart_service::CartService;
use crate::ports::{ApiError, AuthEvents, CartRepository, CredentialStore, HttpClient};

/// Long-lived client session: API access, cart state, and identity.
pub struct Session<H, C, R, E> {
    api: ApiClient<H, C, E>,
    credentials: Arc<C>,
    cart: CartService<R>,
    claims: Option<AccessClaims>,
}

impl<H, C, R, E> Session<H, C, R, E>
where
    H: HttpClient,
    C: CredentialStore,
    R: CartRepository,
    E: AuthEvents,
{
    /// Builds a session from its adapters, rehydrating the cart and any
    /// stored identity.
    ///
    /// A stored access token that no longer decodes is treated as garbage:
    /// the credentials are cleared and the session starts anonymous.
    pub async fn new(http: Arc<H>, credentials: Arc<C>, cart_repo: Arc<R>, events: Arc<E>) -> Self {
        let api = ApiClient::new(Arc::clone(&http), Arc::clone(&credentials), events);
        let cart = CartService::load(cart_repo).await;
        let claims = Self::restore_claims(&credentials).await;
        Self {
            api,
            credentials,
            cart,
            claims,
        }
    }

    async fn restore_claims(credentials: &Arc<C>) -> Option<AccessClaims> {
        let token = match credentials.access_token().await {
            Ok(token) => token?,
            Err(error) => {
                warn!(%error, "could not read stored access token");
                return None;
            }
        };
        match AccessClaims::decode_unverified(&token) {
            Ok(claims) => {
                debug!(user_id = ?claims.user_id, "restored stored identity");
                Some(claims)
            }
            Err(error) => {
                warn!(%error, "stored access token is unreadable, discarding");
                if let Err(error) = credentials.clear().await {
                    warn!(%error, "could not clear unreadable credentials");
                }
                None
            }
        }
    }

    /// Logs in, stores the issued tokens, and caches the identity claims.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] with status 401 for bad credentials,
    /// or [`ApiError::Decode`] when the issued access token is malformed.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let pair = self.api.login(credentials).await?;
        let claims = AccessClaims::decode_unverified(&pair.access)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(user_id = ?claims.user_id, "logged in");
        self.claims = Some(claims);
        Ok(pair)
    }

    /// Drops the identity: clears stored credentials, forgets the claims,
    /// and flushes the cart snapshot.
    pub async fn logout(&mut self) {
        if let Err(error) = self.credentials.clear().await {
            warn!(%error, "could not clear credentials on logout");
        }
        self.claims = None;
        self.cart.flush().await;
    }

    /// Whether a stored access token exists and has not expired.
    ///
    /// Reads the store rather than the cached claims so an externally
    /// refreshed token is honored.
    pub async fn is_authenticated(&self) -> bool {
        let token = match self.credentials.access_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(error) => {
                warn!(%error, "could not read stored access token");
                return false;
            }
        };
        AccessClaims::decode_unverified(&token).is_ok_and(|claims| !claims.is_expired())
    }

    /// The typed API client.
    pub const fn api(&self) -> &ApiClient<H, C, E> {
        &self.api
    }

    /// The cart service, read-only.
    pub const fn cart(&self) -> &CartService<R> {
        &self.cart
    }

    /// The cart service, for mutations.
    pub const fn cart_mut(&mut self) -> &mut CartService<R> {
        &mut self.cart
    }

    /// Claims from the last decoded access token, if any.
    pub const fn claims(&self) -> Option<&AccessClaims> {
        self.claims.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        CountingAuthEvents, MemoryCartRepository, MemoryCredentialStore, RecordingHttpClient,
    };
    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use bazaar_domain::ApiResponse;
    use pretty_assertions::assert_eq;

    fn token(exp: i64, user_id: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp},"user_id":{user_id}}}"#));
        format!("{header}.{payload}.sig")
    }

    fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    async fn session_with(
        http: Arc<RecordingHttpClient>,
        credentials: Arc<MemoryCredentialStore>,
    ) -> Session<RecordingHttpClient, MemoryCredentialStore, MemoryCartRepository, CountingAuthEvents>
    {
        Session::new(
            http,
            credentials,
            Arc::new(MemoryCartRepository::new()),
            Arc::new(CountingAuthEvents::new()),
        )
        .await
    }

    #[tokio::test]
    async fn test_login_caches_claims() {
        let access = token(far_future(), 7);
        let http = Arc::new(RecordingHttpClient::with_responses(vec![Ok(
            ApiResponse::new(
                200,
                serde_json::json!({"access": access, "refresh": "r1"}),
            ),
        )]));
        let credentials = Arc::new(MemoryCredentialStore::new());
        let mut session = session_with(http, Arc::clone(&credentials)).await;

        assert!(session.claims().is_none());
        session
            .login(&Credentials {
                username: "ada".to_owned(),
                password: "pw".to_owned(),
            })
            .await
            .expect("login");

        assert_eq!(session.claims().and_then(|c| c.user_id), Some(7));
        assert!(session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_identity() {
        let credentials = Arc::new(MemoryCredentialStore::new());
        credentials
            .store_pair(&TokenPair {
                access: token(far_future(), 7),
                refresh: "r1".to_owned(),
            })
            .await
            .expect("seed");
        let http = Arc::new(RecordingHttpClient::default());
        let mut session = session_with(http, Arc::clone(&credentials)).await;
        assert!(session.claims().is_some());

        session.logout().await;

        assert!(session.claims().is_none());
        assert!(!session.is_authenticated().await);
        assert_eq!(credentials.access_token().await.expect("read"), None);
    }

    #[tokio::test]
    async fn test_expired_token_is_not_authenticated() {
        let credentials = Arc::new(MemoryCredentialStore::new());
        credentials
            .store_access(&token(chrono::Utc::now().timestamp() - 60, 7))
            .await
            .expect("seed");
        let http = Arc::new(RecordingHttpClient::default());
        let session = session_with(http, Arc::clone(&credentials)).await;

        // Claims still decode for display purposes, but the session is stale.
        assert!(session.claims().is_some());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_garbage_stored_token_is_discarded() {
        let credentials = Arc::new(MemoryCredentialStore::new());
        credentials
            .store_access("not-a-jwt")
            .await
            .expect("seed");
        let http = Arc::new(RecordingHttpClient::default());
        let session = session_with(http, Arc::clone(&credentials)).await;

        assert!(session.claims().is_none());
        assert_eq!(credentials.access_token().await.expect("read"), None);
    }
}
