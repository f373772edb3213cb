//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the API server with its full configuration state.

use crate::cli::actions::{server::Args, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let token_secret = matches
        .get_one::<String>("token-secret")
        .cloned()
        .context("missing required argument: --token-secret")?;

    let frontend_base_url = matches
        .get_one::<String>("frontend-base-url")
        .cloned()
        .unwrap_or_else(|| "http://localhost:5173".to_string());
    let frontend_redirect_path = matches
        .get_one::<String>("frontend-redirect-path")
        .cloned()
        .unwrap_or_else(|| "/proposal".to_string());
    let link_token_ttl_seconds = matches
        .get_one::<i64>("link-token-ttl-seconds")
        .copied()
        .unwrap_or(600);
    let session_ttl_seconds = matches
        .get_one::<i64>("session-ttl-seconds")
        .copied()
        .unwrap_or(604_800);
    let production = matches.get_flag("production");

    let resend_api_key = matches
        .get_one::<String>("resend-api-key")
        .cloned()
        .map(SecretString::from);
    let email_from = matches
        .get_one::<String>("email-from")
        .cloned()
        .unwrap_or_else(|| "onboarding@resend.dev".to_string());
    let sandbox_recipient = matches.get_one::<String>("sandbox-recipient").cloned();

    Ok(Action::Server(Args {
        port,
        frontend_base_url,
        frontend_redirect_path,
        token_secret: SecretString::from(token_secret),
        link_token_ttl_seconds,
        session_ttl_seconds,
        production,
        resend_api_key,
        email_from,
        sandbox_recipient,
    }))
}
