//! Password hashing and token issuance.
//!
//! Two components live here, and only here:
//!
//! - [`password::PasswordHasher`] is the single place plaintext passwords are
//!   handled. Hashes are bcrypt with a per-call random salt.
//! - [`token::TokenCodec`] turns identity claims into a signed, self-expiring
//!   token and back. Verification is a pure function of the token and the
//!   shared secret, which is what lets any trusted service validate sessions
//!   without a database round trip.

pub mod password;
pub mod token;

mod state;
pub use state::{AuthConfig, AuthState, DEFAULT_TOKEN_TTL_SECONDS};
