//! # Taskgate (Task Tracker Auth Authority)
//!
//! `taskgate` issues and validates bearer credentials for the multi-service
//! task tracker. A password becomes a signed, self-expiring session token at
//! login; any trusted service holding the shared secret verifies that token
//! on its own, with no shared session table.
//!
//! ## Session Trust Model
//!
//! - **Stateless verification:** a token is valid iff its signature checks
//!   out against the shared secret and its expiry has not passed. The
//!   credential store is never consulted for verification.
//! - **Fixed expiry:** tokens live for 24 hours from issuance. There is no
//!   sliding expiry and no revocation; a stolen token stays valid until it
//!   expires.
//! - **Uniform login failures:** unknown-user and wrong-password login
//!   attempts return identical responses so account existence never leaks
//!   through the login endpoint.
//!
//! ## Components
//!
//! - [`auth`] — password hashing (bcrypt) and the token codec (HS256 JWT).
//! - [`store`] — the credential store seam: Postgres-backed in production,
//!   in-memory for tests and local runs.
//! - [`api`] — the HTTP surface: register, login, verify, profile, health.
//! - [`client`] — the session client state machine used by frontends and
//!   downstream tools: restores sessions on startup, attaches bearer
//!   credentials, and drops the session on any 401.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod store;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
