//! Magic-link auth handlers and supporting modules.
//!
//! Three endpoints drive the whole flow: `request-link` issues a short-lived
//! signed link token and delegates delivery, `verify` exchanges that token
//! for a 7-day session cookie, and `status`/`logout` introspect and clear the
//! cookie. No server-side session state exists; the cookie is the session.
//!
//! ## Error collapsing
//!
//! Every link-verification failure (malformed, tampered, expired, wrong
//! purpose) produces the same `400` with the same body. The concrete cause
//! is logged, never returned, so the endpoint cannot be used as an oracle for
//! token validity.

mod claims;
pub(crate) mod request_link;
pub(crate) mod session;
mod state;
pub(crate) mod types;
mod utils;
pub(crate) mod verify;

pub use claims::{LinkPayload, SessionPayload};
pub use state::{AuthConfig, AuthState};

#[cfg(test)]
mod tests;
