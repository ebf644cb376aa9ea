//! Auth configuration and shared request state.

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenCodec;
use crate::store::CredentialStore;
use chrono::Duration;
use secrecy::SecretString;
use std::sync::Arc;

/// Tokens live for 24 hours from issuance, with no sliding expiry.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    token_ttl_seconds: i64,
    bcrypt_cost: u32,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            bcrypt_cost: PasswordHasher::DEFAULT_COST,
        }
    }

    #[must_use]
    pub fn with_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    #[must_use]
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    #[must_use]
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a request handler needs: config, codec, hasher, and the
/// credential store behind its seam. Immutable after startup, so concurrent
/// requests share it without coordination.
pub struct AuthState {
    config: AuthConfig,
    codec: TokenCodec,
    hasher: PasswordHasher,
    store: Arc<dyn CredentialStore>,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, secret: &SecretString, store: Arc<dyn CredentialStore>) -> Self {
        let codec = TokenCodec::new(secret);
        let hasher = PasswordHasher::new(config.bcrypt_cost());
        Self {
            config,
            codec,
            hasher,
            store,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    #[must_use]
    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    #[must_use]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        Duration::seconds(self.config.token_ttl_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new();

        assert_eq!(config.token_ttl_seconds(), DEFAULT_TOKEN_TTL_SECONDS);
        assert_eq!(config.bcrypt_cost(), PasswordHasher::DEFAULT_COST);

        let config = config.with_token_ttl_seconds(60).with_bcrypt_cost(4);

        assert_eq!(config.token_ttl_seconds(), 60);
        assert_eq!(config.bcrypt_cost(), 4);
    }

    #[test]
    fn auth_state_derives_ttl_from_config() {
        let secret = SecretString::from("test-shared-secret".to_string());
        let store = Arc::new(MemoryCredentialStore::default());
        let state = AuthState::new(AuthConfig::new().with_token_ttl_seconds(90), &secret, store);

        assert_eq!(state.token_ttl(), Duration::seconds(90));
    }
}
