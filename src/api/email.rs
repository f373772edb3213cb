//! Email delivery abstractions for outbound magic-link messages.
//!
//! The link issuer depends only on the `EmailSender` trait. Production
//! deployments use `ResendEmailSender`, which posts to the Resend HTTP API;
//! deployments without an API key get `LogEmailSender`, which logs the
//! message and reports success so link issuance keeps working end to end.
//!
//! Exactly one delivery attempt is made per call. Retries, if any, belong to
//! the provider; a failure here surfaces to the caller as a failed request.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;
use ulid::Ulid;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Email delivery abstraction used by the link issuer.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message and return the provider's delivery id, or an error.
    async fn send(&self, message: &EmailMessage) -> Result<String>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        let delivery_id = Ulid::new().to_string();
        info!(
            to = %message.to,
            subject = %message.subject,
            html_len = message.html.len(),
            text_len = message.text.len(),
            delivery_id = %delivery_id,
            "email send stub"
        );
        Ok(delivery_id)
    }
}

/// Sender backed by the Resend HTTP API.
#[derive(Clone, Debug)]
pub struct ResendEmailSender {
    client: Client,
    api_key: SecretString,
    from: String,
}

impl ResendEmailSender {
    /// Build a sender with its own HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_key: SecretString, from: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("Failed to build email HTTP client")?;

        Ok(Self {
            client,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<String> {
        let payload = serde_json::json!({
            "from": self.from,
            "to": [message.to],
            "subject": message.subject,
            "html": message.html,
            "text": message.text,
        });

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(self.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .context("Email delivery request failed")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(anyhow!("email delivery failed: {status}: {body}"));
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).context("Invalid email provider response")?;
        let delivery_id = value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| anyhow!("email provider response missing delivery id"))?;

        Ok(delivery_id.to_string())
    }
}
