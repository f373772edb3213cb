//! Link verification endpoint: exchange a sign-in token for a session cookie.

use axum::{
    extract::{Extension, Query},
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::token::{sign_hs256, verify_hs256, Claims};

use super::claims::{LinkPayload, SessionPayload, PURPOSE_LOGIN};
use super::session::session_cookie;
use super::state::AuthState;
use super::types::VerifyLinkQuery;
use super::utils::now_unix_seconds;

/// Anything shorter cannot be a signed token; rejected before any
/// cryptographic work.
const MIN_TOKEN_LENGTH: usize = 20;

/// Single outward message for every rejection. Callers never learn whether a
/// token was malformed, tampered, expired, or minted for another purpose.
const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

fn invalid_token_response() -> Response {
    (StatusCode::BAD_REQUEST, INVALID_TOKEN_MESSAGE.to_string()).into_response()
}

/// Verify an emailed sign-in link and start a session.
#[utoipa::path(
    get,
    path = "/auth/verify",
    params(VerifyLinkQuery),
    responses(
        (status = 302, description = "Session started; redirect to the frontend"),
        (status = 400, description = "Invalid or expired token", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_link(
    auth_state: Extension<Arc<AuthState>>,
    query: Query<VerifyLinkQuery>,
) -> impl IntoResponse {
    let Some(token) = query.0.token else {
        warn!("link verification rejected: missing token");
        return invalid_token_response();
    };
    if token.len() < MIN_TOKEN_LENGTH {
        warn!(token_len = token.len(), "link verification rejected: short token");
        return invalid_token_response();
    }

    let config = auth_state.config();
    let now = now_unix_seconds();
    let claims: Claims<LinkPayload> = match verify_hs256(&token, config.token_secret(), now) {
        Ok(claims) => claims,
        Err(err) => {
            // Cause stays in the logs; the response is the same for all of them.
            warn!("link verification rejected: {err}");
            return invalid_token_response();
        }
    };
    if claims.payload.purpose != PURPOSE_LOGIN {
        warn!(purpose = %claims.payload.purpose, "link verification rejected: wrong purpose");
        return invalid_token_response();
    }

    let session_token = match sign_hs256(
        config.token_secret(),
        SessionPayload::user(claims.payload.email),
        now,
        config.session_ttl_seconds(),
    ) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to sign session token: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut headers = HeaderMap::new();
    match session_cookie(config, &session_token) {
        Ok(cookie) => {
            headers.insert(axum::http::header::SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    match HeaderValue::from_str(&config.redirect_target()) {
        Ok(location) => {
            headers.insert(LOCATION, location);
        }
        Err(err) => {
            error!("Failed to build redirect location: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    (StatusCode::FOUND, headers).into_response()
}
