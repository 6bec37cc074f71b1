//! The authenticated HTTP client and its refresh protocol.
//!
//! Per logical request the client walks the phase machine
//! `Initial -> Sent -> (Success | Unauthorized)` and, on a 401,
//! `Unauthorized -> Refreshing -> (RetriedSuccess | RefreshFailed)`.
//! At most one refresh-and-retry cycle runs per original request; the
//! retried request is never refreshed again, which rules out retry loops.
//!
//! Concurrent requests that each hit a 401 run their own refresh attempt;
//! in-flight refreshes are not deduplicated.

use std::sync::Arc;

use bazaar_domain::{ApiRequest, ApiResponse};
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::ports::{ApiError, AuthEvents, CredentialStore, HttpClient};

/// Phase of one logical request as it moves through the refresh protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    /// Not yet dispatched.
    Initial,
    /// Dispatched, awaiting the first response.
    Sent,
    /// First response was not a 401.
    Success,
    /// First response was a 401; the refresh protocol takes over.
    Unauthorized,
    /// A token refresh call is in flight.
    Refreshing,
    /// The request was re-issued with a fresh token and answered.
    RetriedSuccess,
    /// The refresh failed; the session is over.
    RefreshFailed,
}

impl std::fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Sent => "sent",
            Self::Success => "success",
            Self::Unauthorized => "unauthorized",
            Self::Refreshing => "refreshing",
            Self::RetriedSuccess => "retried_success",
            Self::RefreshFailed => "refresh_failed",
        };
        f.write_str(name)
    }
}

/// Body of a successful `POST token/refresh/` call. The endpoint may
/// rotate the refresh token alongside the new access token.
#[derive(Debug, Deserialize)]
struct RefreshedTokens {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// Wrapper around the HTTP transport that attaches the stored bearer
/// credential and silently refreshes it once per request on a 401.
pub struct AuthenticatedClient<H, C, E> {
    http: Arc<H>,
    credentials: Arc<C>,
    events: Arc<E>,
}

impl<H, C, E> Clone for AuthenticatedClient<H, C, E> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            credentials: Arc::clone(&self.credentials),
            events: Arc::clone(&self.events),
        }
    }
}

impl<H, C, E> AuthenticatedClient<H, C, E>
where
    H: HttpClient,
    C: CredentialStore,
    E: AuthEvents,
{
    /// Creates a client over the given transport, credential store, and
    /// event sink.
    pub const fn new(http: Arc<H>, credentials: Arc<C>, events: Arc<E>) -> Self {
        Self {
            http,
            credentials,
            events,
        }
    }

    /// Sends a request with the stored access token attached, running the
    /// refresh protocol on a 401.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] for non-401 error statuses (propagated
    /// unretried), [`ApiError::AuthExpired`] when the refresh protocol
    /// gives up, and [`ApiError::Network`]/[`ApiError::Setup`] for
    /// transport failures.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut phase = RequestPhase::Initial;
        debug!(method = %request.method, path = %request.path, %phase, "preparing request");

        let mut first = request.clone();
        match self.credentials.access_token().await {
            Ok(Some(token)) => first = first.with_bearer(token),
            Ok(None) => {}
            Err(source) => {
                // A broken credential store degrades to an anonymous
                // request rather than blocking the call.
                warn!(error = %source, "could not read access token");
            }
        }

        phase = RequestPhase::Sent;
        debug!(%phase, "dispatching request");
        let response = self.http.execute(first).await?;

        if !response.is_unauthorized() {
            phase = RequestPhase::Success;
            debug!(status = response.status, %phase, "request settled");
            return classify(response);
        }

        phase = RequestPhase::Unauthorized;
        debug!(path = %request.path, %phase, "access token rejected, attempting refresh");

        phase = RequestPhase::Refreshing;
        debug!(%phase, "exchanging refresh token");
        match self.refresh_access_token().await {
            Ok(access) => {
                let retried = self.http.execute(request.with_bearer(access)).await?;
                if retried.is_unauthorized() {
                    // The fresh token was rejected too; one cycle only.
                    self.expire_session().await;
                    return Err(ApiError::AuthExpired);
                }
                phase = RequestPhase::RetriedSuccess;
                debug!(status = retried.status, %phase, "request settled after refresh");
                classify(retried)
            }
            Err(reason) => {
                phase = RequestPhase::RefreshFailed;
                debug!(error = %reason, %phase, "token refresh failed");
                self.expire_session().await;
                // The caller sees the 401-derived failure, never the
                // refresh call's own error.
                Err(ApiError::AuthExpired)
            }
        }
    }

    /// Exchanges the stored refresh token for a new access token and
    /// persists it (plus a rotated refresh token when the endpoint returns
    /// one).
    async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh = self
            .credentials
            .refresh_token()
            .await
            .map_err(|e| ApiError::Setup(e.to_string()))?
            .ok_or_else(|| ApiError::Setup("no refresh token available".to_owned()))?;

        let request =
            ApiRequest::post("token/refresh/").with_json(serde_json::json!({ "refresh": refresh }));
        let response = self.http.execute(request).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }

        let tokens: RefreshedTokens = response
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if let Err(source) = self.credentials.store_access(&tokens.access).await {
            // The retry still runs with the token held in memory.
            warn!(error = %source, "could not persist refreshed access token");
        }
        if let Some(rotated) = &tokens.refresh {
            if let Err(source) = self.credentials.store_refresh(rotated).await {
                warn!(error = %source, "could not persist rotated refresh token");
            }
        }
        Ok(tokens.access)
    }

    /// Clears the stored tokens and fires the logout side effect once.
    async fn expire_session(&self) {
        if let Err(source) = self.credentials.clear().await {
            warn!(error = %source, "could not clear stored credentials");
        }
        self.events.session_expired();
    }
}

/// Turns a settled response into the caller's result, classifying error
/// statuses for observability. No retry happens here.
pub(crate) fn classify(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    match response.status {
        403 => warn!("permission denied"),
        404 => warn!("resource not found"),
        status if status >= 500 => error!(status, "server error"),
        _ => {}
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body,
    })
}
