//! Salted, adaptive password hashing.
//!
//! bcrypt generates a random salt per call, so hashing the same plaintext
//! twice yields different strings. The work happens on the blocking pool so a
//! hash never stalls the request executor. Plaintext is never logged.

use bcrypt::BcryptError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("hashing task failed to complete")]
    Worker,
    #[error(transparent)]
    Bcrypt(#[from] BcryptError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Matches the cost the task tracker has always used for stored hashes.
    pub const DEFAULT_COST: u32 = 10;

    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error if the blocking task is cancelled or bcrypt rejects
    /// the cost parameter.
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let cost = self.cost;
        let plaintext = plaintext.to_string();

        tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|_| PasswordError::Worker)?
            .map_err(PasswordError::from)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// Returns an error if the blocking task is cancelled or the stored hash
    /// is not a valid bcrypt string.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .map_err(|_| PasswordError::Worker)?
            .map_err(PasswordError::from)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps the tests fast
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[tokio::test]
    async fn hash_and_verify_round_trips() -> Result<(), PasswordError> {
        let hasher = hasher();
        let hash = hasher.hash("secret1").await?;

        assert!(hasher.verify("secret1", &hash).await?);
        assert!(!hasher.verify("secret2", &hash).await?);
        Ok(())
    }

    #[tokio::test]
    async fn same_plaintext_hashes_differently() -> Result<(), PasswordError> {
        let hasher = hasher();
        let first = hasher.hash("secret1").await?;
        let second = hasher.hash("secret1").await?;

        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn verify_rejects_garbage_hash() {
        let result = hasher().verify("secret1", "not-a-bcrypt-hash").await;
        assert!(result.is_err());
    }
}
