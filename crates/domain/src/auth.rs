//! Credential types and unverified access-token claims.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Login credentials for `POST token/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// An access/refresh token pair as issued by the authentication endpoint.
///
/// Both tokens are opaque strings to this client. Only one access token is
/// live at a time; a successful refresh replaces it in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer credential.
    pub access: String,
    /// Longer-lived credential used solely to obtain a new access token.
    pub refresh: String,
}

/// Claims read from the payload segment of a JWT access token.
///
/// The signature is *not* verified here: the decoded claims drive only the
/// client-side expiry check, and authorization remains server-enforced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessClaims {
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Identifier of the authenticated user, when the issuer includes it.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl AccessClaims {
    /// Decodes the claims from the middle segment of a JWT without
    /// verifying the signature.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidToken`] when the token does not have
    /// three segments, the payload is not valid base64url, or the claims
    /// are not the expected JSON shape.
    pub fn decode_unverified(token: &str) -> DomainResult<Self> {
        let mut segments = token.split('.');
        let payload = segments
            .nth(1)
            .ok_or_else(|| DomainError::InvalidToken("missing payload segment".to_owned()))?;
        if segments.next().is_none() {
            return Err(DomainError::InvalidToken(
                "missing signature segment".to_owned(),
            ));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| DomainError::InvalidToken(format!("payload is not base64url: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::InvalidToken(format!("claims are not valid JSON: {e}")))
    }

    /// The expiry instant of the token.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at the given instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_none_or(|exp| now >= exp)
    }

    /// Whether the token is expired now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
