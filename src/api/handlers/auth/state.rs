//! Auth configuration and shared request state.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::api::email::EmailSender;

const DEFAULT_LINK_TOKEN_TTL_SECONDS: i64 = 10 * 60;
const DEFAULT_SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_REDIRECT_PATH: &str = "/proposal";

/// Immutable configuration, built once at startup and never mutated.
///
/// Handlers read everything through this struct; nothing is pulled from
/// ambient process state at request time.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    redirect_path: String,
    token_secret: SecretString,
    link_token_ttl_seconds: i64,
    session_ttl_seconds: i64,
    production: bool,
    sandbox_recipient: Option<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String, token_secret: SecretString) -> Self {
        Self {
            frontend_base_url,
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            token_secret,
            link_token_ttl_seconds: DEFAULT_LINK_TOKEN_TTL_SECONDS,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            production: false,
            sandbox_recipient: None,
        }
    }

    #[must_use]
    pub fn with_redirect_path(mut self, path: String) -> Self {
        self.redirect_path = path;
        self
    }

    #[must_use]
    pub fn with_link_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.link_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    #[must_use]
    pub fn with_sandbox_recipient(mut self, recipient: Option<String>) -> Self {
        self.sandbox_recipient = recipient;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    /// Absolute redirect target for a verified sign-in.
    pub(super) fn redirect_target(&self) -> String {
        let base = self.frontend_base_url.trim_end_matches('/');
        format!("{base}{}", self.redirect_path)
    }

    pub(super) fn token_secret(&self) -> &[u8] {
        self.token_secret.expose_secret().as_bytes()
    }

    pub(super) fn link_token_ttl_seconds(&self) -> i64 {
        self.link_token_ttl_seconds
    }

    pub(super) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub(super) fn production(&self) -> bool {
        self.production
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.production
    }

    pub(super) fn sandbox_recipient(&self) -> Option<&str> {
        self.sandbox_recipient.as_deref()
    }
}

pub struct AuthState {
    config: AuthConfig,
    email: Arc<dyn EmailSender>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, email: Arc<dyn EmailSender>) -> Self {
        Self { config, email }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn email_sender(&self) -> &dyn EmailSender {
        self.email.as_ref()
    }
}
