//! API handlers for the magic-link authentication service.

pub mod auth;
pub mod health;
