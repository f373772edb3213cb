//! Link issuance endpoint: mint a sign-in token and hand it to email delivery.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::api::email::EmailMessage;
use crate::api::templates::{magic_link_html, magic_link_subject, magic_link_text};
use crate::token::sign_hs256;

use super::claims::LinkPayload;
use super::state::AuthState;
use super::types::{ErrorResponse, RequestLinkRequest, RequestLinkResponse};
use super::utils::{build_callback_url, normalize_email, now_unix_seconds, valid_email};

/// Request a magic sign-in link for an email address.
#[utoipa::path(
    post,
    path = "/auth/request-link",
    request_body = RequestLinkRequest,
    responses(
        (status = 200, description = "Link issued and handed to delivery", body = RequestLinkResponse),
        (status = 400, description = "Malformed email address", body = ErrorResponse),
        (status = 502, description = "Email delivery failed", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn request_link(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RequestLinkRequest>>,
) -> impl IntoResponse {
    // A missing body is indistinguishable from an empty email: both fail
    // validation below without minting anything.
    let email = payload.map_or_else(String::new, |Json(request)| request.email);
    let email = normalize_email(&email);
    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("invalid_email")),
        )
            .into_response();
    }

    let config = auth_state.config();
    let now = now_unix_seconds();
    let token = match sign_hs256(
        config.token_secret(),
        LinkPayload::login(email.clone()),
        now,
        config.link_token_ttl_seconds(),
    ) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to sign link token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("internal_error")),
            )
                .into_response();
        }
    };

    let link = build_callback_url(config.frontend_base_url(), &token);
    let minutes = config.link_token_ttl_seconds() / 60;

    // Outside production an optional sandbox recipient absorbs all deliveries;
    // the note inside the email names the address that was actually requested.
    let (delivery_to, sandbox_note) = match config.sandbox_recipient() {
        Some(sandbox) if !config.production() => (
            sandbox.to_string(),
            Some(format!(
                "Delivered to {sandbox}; the requested address was {email}."
            )),
        ),
        _ => (email.clone(), None),
    };

    let message = EmailMessage {
        to: delivery_to.clone(),
        subject: magic_link_subject(),
        html: magic_link_html(&link, &email, minutes, sandbox_note.as_deref()),
        text: magic_link_text(&link, &email, minutes, sandbox_note.as_deref()),
    };

    match auth_state.email_sender().send(&message).await {
        Ok(delivery_id) => {
            debug!(delivery_id = %delivery_id, to = %delivery_to, "magic link dispatched");
            (
                StatusCode::OK,
                Json(RequestLinkResponse {
                    ok: true,
                    sent_to: delivery_to,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Failed to deliver magic link: {err}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new("delivery_failed")),
            )
                .into_response()
        }
    }
}
