//! End-to-end handler tests for the magic-link flow.
//!
//! Handlers are invoked directly with their `Extension` state and a capturing
//! email sender; no listener is bound.

use anyhow::{anyhow, Context, Result};
use axum::body::to_bytes;
use axum::extract::{Extension, Query};
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::SecretString;
use std::sync::{Arc, Mutex};

use crate::api::email::{EmailMessage, EmailSender};
use crate::token::{sign_hs256, verify_hs256, Claims};

use super::claims::{LinkPayload, SessionPayload};
use super::request_link::request_link;
use super::session::{logout, status, SESSION_COOKIE_NAME};
use super::state::{AuthConfig, AuthState};
use super::types::{RequestLinkRequest, VerifyLinkQuery};
use super::utils::now_unix_seconds;
use super::verify::verify_link;

const TEST_SECRET: &str = "test-secret-key-0123456789abcdef";
const FRONTEND: &str = "http://localhost:5173";
const INVALID_TOKEN_BODY: &str = "Invalid or expired token";

struct CapturingEmailSender {
    messages: Mutex<Vec<EmailMessage>>,
}

impl CapturingEmailSender {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
        })
    }

    fn last_message(&self) -> Option<EmailMessage> {
        self.messages
            .lock()
            .expect("sender lock poisoned")
            .last()
            .cloned()
    }

    fn message_count(&self) -> usize {
        self.messages.lock().expect("sender lock poisoned").len()
    }
}

#[async_trait::async_trait]
impl EmailSender for CapturingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        self.messages
            .lock()
            .expect("sender lock poisoned")
            .push(message.clone());
        Ok("captured".to_string())
    }
}

struct FailingEmailSender;

#[async_trait::async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _message: &EmailMessage) -> Result<String> {
        Err(anyhow!("provider unavailable"))
    }
}

fn test_config() -> AuthConfig {
    AuthConfig::new(
        FRONTEND.to_string(),
        SecretString::from(TEST_SECRET.to_string()),
    )
}

fn auth_state_with(config: AuthConfig, sender: Arc<dyn EmailSender>) -> Arc<AuthState> {
    Arc::new(AuthState::new(config, sender))
}

async fn body_json(response: Response) -> Result<serde_json::Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn body_text(response: Response) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn token_from_message(message: &EmailMessage) -> Result<String> {
    message
        .text
        .rsplit("token=")
        .next()
        .map(str::to_string)
        .context("no token in message text")
}

fn cookie_value(response: &Response) -> Result<String> {
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?;
    let prefix = format!("{SESSION_COOKIE_NAME}=");
    let rest = cookie
        .strip_prefix(prefix.as_str())
        .context("unexpected cookie name")?;
    Ok(rest
        .split(';')
        .next()
        .unwrap_or_default()
        .to_string())
}

fn cookie_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={token}"))?,
    );
    Ok(headers)
}

#[tokio::test]
async fn request_link_then_verify_starts_session() -> Result<()> {
    let sender = CapturingEmailSender::new();
    let state = auth_state_with(test_config(), sender.clone());

    let response = request_link(
        Extension(state.clone()),
        Some(Json(RequestLinkRequest {
            email: "  USER@Example.com ".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await?;
    assert_eq!(value["ok"], true);
    // The requested address is normalized before anything else happens.
    assert_eq!(value["sentTo"], "user@example.com");

    let message = sender.last_message().context("no email captured")?;
    assert_eq!(message.to, "user@example.com");
    let token = token_from_message(&message)?;
    assert!(token.len() >= 20);

    let response = verify_link(
        Extension(state),
        Query(VerifyLinkQuery { token: Some(token) }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response
            .headers()
            .get(LOCATION)
            .context("missing Location header")?,
        &format!("{FRONTEND}/proposal")
    );

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));
    // Not a production deployment, so no Secure attribute.
    assert!(!set_cookie.contains("Secure"));

    let session_token = cookie_value(&response)?;
    let claims: Claims<SessionPayload> =
        verify_hs256(&session_token, TEST_SECRET.as_bytes(), now_unix_seconds())?;
    assert_eq!(claims.payload.email, "user@example.com");
    assert_eq!(claims.payload.role, "user");
    assert_eq!(claims.exp - claims.iat, 604_800);
    Ok(())
}

#[tokio::test]
async fn request_link_rejects_invalid_email_without_delivery() -> Result<()> {
    let sender = CapturingEmailSender::new();
    let state = auth_state_with(test_config(), sender.clone());

    for email in ["", "not-an-email", "missing@domain"] {
        let response = request_link(
            Extension(state.clone()),
            Some(Json(RequestLinkRequest {
                email: email.to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = body_json(response).await?;
        assert_eq!(value["error"], "invalid_email");
    }

    let response = request_link(Extension(state), None).await.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(sender.message_count(), 0);
    Ok(())
}

#[tokio::test]
async fn request_link_surfaces_delivery_failure() -> Result<()> {
    let state = auth_state_with(test_config(), Arc::new(FailingEmailSender));

    let response = request_link(
        Extension(state),
        Some(Json(RequestLinkRequest {
            email: "alice@example.com".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let value = body_json(response).await?;
    assert_eq!(value["error"], "delivery_failed");
    Ok(())
}

#[tokio::test]
async fn request_link_redirects_delivery_to_sandbox() -> Result<()> {
    let sender = CapturingEmailSender::new();
    let config =
        test_config().with_sandbox_recipient(Some("sandbox@example.com".to_string()));
    let state = auth_state_with(config, sender.clone());

    let response = request_link(
        Extension(state),
        Some(Json(RequestLinkRequest {
            email: "Alice@Example.com".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await?;
    // sentTo reflects where delivery was actually attempted.
    assert_eq!(value["sentTo"], "sandbox@example.com");

    let message = sender.last_message().context("no email captured")?;
    assert_eq!(message.to, "sandbox@example.com");
    assert!(message.text.contains("alice@example.com"));
    assert!(message.text.contains("[Sandbox]"));
    Ok(())
}

#[tokio::test]
async fn production_delivery_ignores_sandbox_recipient() -> Result<()> {
    let sender = CapturingEmailSender::new();
    let config = test_config()
        .with_production(true)
        .with_sandbox_recipient(Some("sandbox@example.com".to_string()));
    let state = auth_state_with(config, sender.clone());

    let response = request_link(
        Extension(state),
        Some(Json(RequestLinkRequest {
            email: "alice@example.com".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await?;
    assert_eq!(value["sentTo"], "alice@example.com");

    let message = sender.last_message().context("no email captured")?;
    assert_eq!(message.to, "alice@example.com");
    assert!(!message.text.contains("[Sandbox]"));
    Ok(())
}

#[tokio::test]
async fn verify_rejects_missing_and_short_tokens() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    let response = verify_link(
        Extension(state.clone()),
        Query(VerifyLinkQuery { token: None }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await?, INVALID_TOKEN_BODY);

    let response = verify_link(
        Extension(state),
        Query(VerifyLinkQuery {
            token: Some(String::new()),
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await?, INVALID_TOKEN_BODY);
    Ok(())
}

#[tokio::test]
async fn verify_rejects_expired_link_token() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    // Minted eleven minutes ago with a ten-minute TTL.
    let token = sign_hs256(
        TEST_SECRET.as_bytes(),
        LinkPayload::login("alice@example.com".to_string()),
        now_unix_seconds() - 660,
        600,
    )?;

    let response = verify_link(
        Extension(state),
        Query(VerifyLinkQuery { token: Some(token) }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await?, INVALID_TOKEN_BODY);
    Ok(())
}

#[tokio::test]
async fn verify_rejects_foreign_secret_and_wrong_purpose() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    let forged = sign_hs256(
        b"some-other-secret-key-deadbeef00",
        LinkPayload::login("alice@example.com".to_string()),
        now_unix_seconds(),
        600,
    )?;
    let response = verify_link(
        Extension(state.clone()),
        Query(VerifyLinkQuery {
            token: Some(forged),
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await?, INVALID_TOKEN_BODY);

    // Well-formed and unexpired, but minted for another purpose.
    let wrong_purpose = sign_hs256(
        TEST_SECRET.as_bytes(),
        LinkPayload {
            email: "alice@example.com".to_string(),
            purpose: "signup".to_string(),
        },
        now_unix_seconds(),
        600,
    )?;
    let response = verify_link(
        Extension(state),
        Query(VerifyLinkQuery {
            token: Some(wrong_purpose),
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await?, INVALID_TOKEN_BODY);
    Ok(())
}

#[tokio::test]
async fn verify_sets_secure_cookie_in_production() -> Result<()> {
    let state = auth_state_with(
        test_config().with_production(true),
        CapturingEmailSender::new(),
    );

    let token = sign_hs256(
        TEST_SECRET.as_bytes(),
        LinkPayload::login("alice@example.com".to_string()),
        now_unix_seconds(),
        600,
    )?;
    let response = verify_link(
        Extension(state),
        Query(VerifyLinkQuery { token: Some(token) }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::FOUND);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?;
    assert!(set_cookie.contains("; Secure"));
    Ok(())
}

#[tokio::test]
async fn status_without_cookie_is_unauthenticated() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    let response = status(HeaderMap::new(), Extension(state))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await?;
    assert_eq!(value["authenticated"], false);
    assert!(value.get("user").is_none());
    Ok(())
}

#[tokio::test]
async fn status_reports_live_session_claims() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    let now = now_unix_seconds();
    let token = sign_hs256(
        TEST_SECRET.as_bytes(),
        SessionPayload::user("alice@example.com".to_string()),
        now,
        604_800,
    )?;
    let response = status(cookie_headers(&token)?, Extension(state))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let value = body_json(response).await?;
    assert_eq!(value["authenticated"], true);
    assert_eq!(value["user"]["email"], "alice@example.com");
    assert_eq!(value["user"]["role"], "user");
    assert_eq!(value["user"]["issuedAt"], now);
    assert_eq!(value["user"]["expiresAt"], now + 604_800);
    Ok(())
}

#[tokio::test]
async fn status_treats_bad_cookies_as_absent() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    let expired = sign_hs256(
        TEST_SECRET.as_bytes(),
        SessionPayload::user("alice@example.com".to_string()),
        now_unix_seconds() - 700_000,
        604_800,
    )?;
    for token in [expired.as_str(), "garbage", ""] {
        let response = status(cookie_headers(token)?, Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let value = body_json(response).await?;
        assert_eq!(value["authenticated"], false);
        assert!(value.get("user").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie_and_ends_session() -> Result<()> {
    let state = auth_state_with(test_config(), CapturingEmailSender::new());

    let response = logout(Extension(state.clone())).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing Set-Cookie header")?
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=;")));
    assert!(set_cookie.contains("Max-Age=0"));

    let value = body_json(response).await?;
    assert_eq!(value["ok"], true);

    // A jar holding the cleared (empty) value no longer authenticates.
    let response = status(cookie_headers("")?, Extension(state))
        .await
        .into_response();
    let value = body_json(response).await?;
    assert_eq!(value["authenticated"], false);
    Ok(())
}
