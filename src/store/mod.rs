//! Credential store seam.
//!
//! The relational store of user records is an external collaborator with a
//! two-operation contract: insert a user (failing if the username is taken)
//! and look one up. [`PgCredentialStore`] is the production implementation;
//! [`MemoryCredentialStore`] backs tests and local runs with the same
//! semantics.

mod memory;
mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// A persisted user. Created at registration and never mutated.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    UsernameTaken,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user and return its server-assigned id.
    ///
    /// Uniqueness is enforced here, not pre-checked by callers, so two
    /// concurrent registrations for the same username cannot race past each
    /// other; the loser gets [`StoreError::UsernameTaken`].
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<i64, StoreError>;

    /// Look up a user by exact, case-sensitive username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;
}
