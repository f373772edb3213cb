//! # Sesamo (Passwordless Magic-Link Authentication)
//!
//! `sesamo` issues short-lived signed sign-in links over email and exchanges
//! them for long-lived, cookie-carried sessions. There is no password store
//! and no server-side session table: both credentials are self-contained
//! `HS256` tokens signed with a process-wide secret.
//!
//! ## Flow
//!
//! 1. `POST /auth/request-link` normalizes the address, mints a 10-minute
//!    link token, and hands the callback URL to the email sender.
//! 2. The client follows the link; `GET /auth/verify` validates the token,
//!    mints a 7-day session token, sets the `sesamo_session` cookie, and
//!    redirects to the frontend.
//! 3. `GET /auth/status` introspects the cookie; `POST /auth/logout`
//!    overwrites it with an already-expired one.
//!
//! ## Sessions
//!
//! Sessions live entirely in the signed cookie. Logout therefore only clears
//! the client's copy; a token exfiltrated elsewhere stays valid until its
//! natural expiry. Link tokens are likewise not single-use: a valid link can
//! be replayed until it expires, each replay minting a fresh session.
//!
//! All token-validation failures collapse into one outward "invalid or
//! expired" outcome; the concrete cause is logged but never surfaced, so
//! callers cannot probe which check failed.

pub mod api;
pub mod cli;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
