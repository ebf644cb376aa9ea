use super::{CredentialStore, StoreError, UserRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};

/// Postgres-backed credential store.
///
/// The `users` table carries a unique constraint on `username`; a violation
/// surfaces as [`StoreError::UsernameTaken`].
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<i64, StoreError> {
        match sqlx::query("INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id")
            .bind(username)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
        {
            Ok(row) => Ok(row.try_get("id").map_err(StoreError::Database)?),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::UsernameTaken)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row =
            sqlx::query("SELECT id, username, password, created_at FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(StoreError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT id, username, password, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(StoreError::Database)
    }
}
