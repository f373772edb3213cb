//! Session cookie wire format plus the status and logout endpoints.
//!
//! Sessions are stateless: the cookie value is the whole session. Reading it
//! means verifying the embedded token; clearing it means overwriting the
//! cookie with an already-expired one. A decode failure of any kind is
//! indistinguishable from "no cookie" to callers.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::token::{verify_hs256, Claims};

use super::claims::SessionPayload;
use super::state::{AuthConfig, AuthState};
use super::types::{LogoutResponse, SessionUser, StatusResponse};
use super::utils::now_unix_seconds;

pub(crate) const SESSION_COOKIE_NAME: &str = "sesamo_session";

/// Build the `Set-Cookie` value carrying the session token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    );
    // Secure only on HTTPS deployments; a Secure cookie never reaches a
    // plain-http dev frontend.
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the `Set-Cookie` value that makes the browser drop the session.
pub(super) fn clear_session_cookie(
    config: &AuthConfig,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie =
        format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

/// Resolve the session cookie into verified claims, if present and valid.
///
/// Absent, expired, tampered, and malformed cookies all come back as `None`;
/// the distinction only exists in the debug log.
pub(super) fn read_session(
    headers: &HeaderMap,
    config: &AuthConfig,
    now_unix_seconds: i64,
) -> Option<Claims<SessionPayload>> {
    let token = extract_session_token(headers)?;
    if token.is_empty() {
        return None;
    }
    match verify_hs256(&token, config.token_secret(), now_unix_seconds) {
        Ok(claims) => Some(claims),
        Err(err) => {
            debug!("session cookie rejected: {err}");
            None
        }
    }
}

/// Report whether the request carries a live session.
#[utoipa::path(
    get,
    path = "/auth/status",
    responses(
        (status = 200, description = "Authentication state for the presented cookie", body = StatusResponse)
    ),
    tag = "auth"
)]
pub async fn status(
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let now = now_unix_seconds();
    let response = match read_session(&headers, auth_state.config(), now) {
        Some(claims) => StatusResponse {
            authenticated: true,
            user: Some(SessionUser {
                email: claims.payload.email,
                role: claims.payload.role,
                issued_at: claims.iat,
                expires_at: claims.exp,
            }),
        },
        None => StatusResponse {
            authenticated: false,
            user: None,
        },
    };
    Json(response)
}

/// End the session by expiring the cookie client-side.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = LogoutResponse)
    ),
    tag = "auth"
)]
pub async fn logout(auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    // Clearing is unconditional; whether a session existed does not matter.
    let mut headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(auth_state.config()) {
        headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::OK, headers, Json(LogoutResponse { ok: true }))
}
