//! Signed session tokens (HS256 JWT).
//!
//! The codec owns the shared secret; swapping the secret means constructing a
//! new codec, never touching the issue/verify logic. Claims carry the user id
//! and username only.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity claims embedded in every session token.
///
/// Field names match the wire format the task services expect
/// (`userId`/`username` plus the standard `iat`/`exp` timestamps).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
}

/// Encodes and decodes signed session tokens with a shared symmetric secret.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a signed token for the given identity, expiring after `ttl`.
    ///
    /// # Errors
    /// Returns [`TokenError::Malformed`] if the claims cannot be encoded.
    pub fn issue(&self, user_id: i64, username: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            iat: now,
            exp: now + ttl.num_seconds(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Malformed)
    }

    /// Decode a token and validate its signature and expiry.
    ///
    /// # Errors
    /// [`TokenError::Expired`] when only the expiry has passed,
    /// [`TokenError::InvalidSignature`] when the signature does not match the
    /// shared secret, [`TokenError::Malformed`] for anything unparseable.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token is dead the instant its expiry passes
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("test-shared-secret".to_string()))
    }

    #[test]
    fn issue_then_verify_round_trips_claims() -> Result<(), TokenError> {
        let codec = codec();
        let token = codec.issue(42, "alice", Duration::hours(24))?;
        let claims = codec.verify(&token)?;

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        Ok(())
    }

    #[test]
    fn expired_token_is_classified_as_expired() -> Result<(), TokenError> {
        let codec = codec();
        let token = codec.issue(42, "alice", Duration::seconds(-60))?;

        assert!(matches!(codec.verify(&token), Err(TokenError::Expired)));
        Ok(())
    }

    #[test]
    fn tampered_signature_is_classified_as_invalid() -> Result<(), TokenError> {
        let codec = codec();
        let mut token = codec.issue(42, "alice", Duration::hours(24))?;

        // Swap the last signature character for another valid base64url one
        let last = token.pop().ok_or(TokenError::Malformed)?;
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert!(matches!(
            codec.verify(&token),
            Err(TokenError::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() -> Result<(), TokenError> {
        let other = TokenCodec::new(&SecretString::from("another-secret".to_string()));
        let token = other.issue(42, "alice", Duration::hours(24))?;

        assert!(matches!(
            codec().verify(&token),
            Err(TokenError::InvalidSignature)
        ));
        Ok(())
    }

    #[test]
    fn garbage_is_classified_as_malformed() {
        assert!(matches!(
            codec().verify("not-a-token"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(codec().verify(""), Err(TokenError::Malformed)));
    }
}
