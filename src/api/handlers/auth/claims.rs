//! Claim payloads carried inside signed link and session tokens.

use serde::{Deserialize, Serialize};

/// Purpose discriminator for link tokens. Only sign-in links exist today;
/// the field keeps a link token from ever being accepted as anything else.
pub(crate) const PURPOSE_LOGIN: &str = "login";

/// The only role minted by the magic-link flow.
pub(crate) const ROLE_USER: &str = "user";

/// Payload of a short-lived sign-in link token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkPayload {
    pub email: String,
    #[serde(rename = "t")]
    pub purpose: String,
}

impl LinkPayload {
    pub(crate) fn login(email: String) -> Self {
        Self {
            email,
            purpose: PURPOSE_LOGIN.to_string(),
        }
    }
}

/// Payload of a long-lived session token carried in the cookie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionPayload {
    pub email: String,
    pub role: String,
}

impl SessionPayload {
    pub(crate) fn user(email: String) -> Self {
        Self {
            email,
            role: ROLE_USER.to_string(),
        }
    }
}
