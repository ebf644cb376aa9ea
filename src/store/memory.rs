use super::{CredentialStore, StoreError, UserRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory credential store for tests and local runs.
///
/// Mirrors the Postgres semantics: server-assigned sequential ids and a
/// uniqueness check at insert time.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: HashMap<String, UserRecord>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert_user(&self, username: &str, password_hash: &str) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.users.contains_key(username) {
            return Err(StoreError::UsernameTaken);
        }

        inner.next_id += 1;
        let record = UserRecord {
            id: inner.next_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(username.to_string(), record);

        Ok(inner.next_id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.values().find(|user| user.id == id).cloned())
    }
}

impl MemoryCredentialStore {
    /// Remove a user out-of-band. Lets tests exercise the "valid token,
    /// subject gone" profile path; the service itself never deletes users.
    pub async fn remove_user(&self, username: &str) {
        let mut inner = self.inner.lock().await;
        inner.users.remove(username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[tokio::test]
    async fn insert_assigns_sequential_ids() -> Result<()> {
        let store = MemoryCredentialStore::default();

        assert_eq!(store.insert_user("alice", "hash-a").await?, 1);
        assert_eq!(store.insert_user("bob", "hash-b").await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() -> Result<()> {
        let store = MemoryCredentialStore::default();
        store.insert_user("alice", "hash-a").await?;

        // A different password changes nothing; the username is the key
        assert!(matches!(
            store.insert_user("alice", "hash-b").await,
            Err(StoreError::UsernameTaken)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn lookups_are_case_sensitive() -> Result<()> {
        let store = MemoryCredentialStore::default();
        let id = store.insert_user("alice", "hash-a").await?;

        assert!(store.find_by_username("Alice").await?.is_none());

        let found = store
            .find_by_username("alice")
            .await?
            .context("alice should exist")?;
        assert_eq!(found.id, id);
        assert_eq!(found.password_hash, "hash-a");

        let by_id = store.find_by_id(id).await?.context("alice should exist")?;
        assert_eq!(by_id.username, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn removed_user_is_gone() -> Result<()> {
        let store = MemoryCredentialStore::default();
        let id = store.insert_user("alice", "hash-a").await?;

        store.remove_user("alice").await;

        assert!(store.find_by_id(id).await?.is_none());
        Ok(())
    }
}
