//! User account types as the backend API serializes them.

use serde::{Deserialize, Serialize};

/// A user profile as returned by `GET users/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Shipping address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Payload for `POST register/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// All-optional payload for `PATCH users/me/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// New shipping address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UserUpdate {
    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone_number.is_none() && self.address.is_none()
    }
}
