//! Compact signed-token codec shared by link and session credentials.
//!
//! The codec is purely claims-in/claims-out: it wraps a caller-supplied
//! payload in an expiry envelope and signs it, or verifies a token and hands
//! the envelope back. What a token *means* (sign-in link vs. session) is the
//! caller's business.

mod hs256;

pub use hs256::{sign_hs256, verify_hs256, Claims, Error, TokenHeader};
