use crate::api::{
    self,
    email::{EmailSender, LogEmailSender, ResendEmailSender},
    handlers::auth::AuthConfig,
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_base_url: String,
    pub frontend_redirect_path: String,
    pub token_secret: SecretString,
    pub link_token_ttl_seconds: i64,
    pub session_ttl_seconds: i64,
    pub production: bool,
    pub resend_api_key: Option<SecretString>,
    pub email_from: String,
    pub sandbox_recipient: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the email sender cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new(args.frontend_base_url, args.token_secret)
        .with_redirect_path(args.frontend_redirect_path)
        .with_link_token_ttl_seconds(args.link_token_ttl_seconds)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_production(args.production)
        .with_sandbox_recipient(args.sandbox_recipient);

    let sender: Arc<dyn EmailSender> = match args.resend_api_key {
        Some(api_key) => Arc::new(ResendEmailSender::new(api_key, args.email_from)?),
        None => {
            info!("No Resend API key configured; magic link emails will be logged only");
            Arc::new(LogEmailSender)
        }
    };

    api::new(args.port, auth_config, sender).await
}
