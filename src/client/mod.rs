//! Session client state machine.
//!
//! The client owns the persisted token and the derived session state, and
//! funnels every authorized request through one chokepoint so the
//! "any 401 ends the session" rule holds no matter which call triggered it.
//!
//! States: `Unknown` (nothing attempted yet) moves to `Restoring` while a
//! persisted token is verified, then to `Authenticated` or
//! `Unauthenticated`. A failed verification always clears the persisted
//! token before the state flips, so a stale token is never paired with an
//! authenticated-looking state.

mod token_store;

pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

use crate::APP_USER_AGENT;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Request timeout applied to every call; a hung verification must not leave
/// the session stuck in `Restoring`.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Identity of the signed-in user, as confirmed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unknown,
    Restoring,
    Authenticated(Identity),
    Unauthenticated,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("token storage error: {0}")]
    TokenStore(#[from] std::io::Error),
    #[error("no session token held")]
    NotAuthenticated,
    #[error("session rejected by the server")]
    SessionRejected,
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
    #[serde(rename = "userId")]
    user_id: i64,
    username: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(rename = "userId")]
    user_id: i64,
    username: String,
}

#[derive(Deserialize)]
struct RegisterResponse {
    #[serde(rename = "userId")]
    user_id: i64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Profile as served by `GET /api/auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub created_at: String,
}

/// Holds the current token and session state for one user of the service.
///
/// Methods take `&mut self`: session handling is cooperative, with at most
/// one auth call in flight, matching how a UI serializes them by disabling
/// its controls.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    state: SessionState,
}

impl SessionClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            store,
            state: SessionState::Unknown,
        })
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Restore the session from the persisted token, as on a page load.
    ///
    /// No token means `Unauthenticated` with no network call. A token is
    /// verified against the server; any failure, network trouble included,
    /// fails closed: the token is discarded and the session ends.
    ///
    /// # Errors
    /// Returns an error only if the token store itself fails; a rejected or
    /// unverifiable token is a state transition, not an error.
    pub async fn restore(&mut self) -> Result<&SessionState, ClientError> {
        let Some(token) = self.store.load()? else {
            self.state = SessionState::Unauthenticated;
            return Ok(&self.state);
        };

        self.state = SessionState::Restoring;

        match self.verify_token(&token).await {
            Ok(identity) => {
                debug!("Session restored: {}", identity.username);
                self.state = SessionState::Authenticated(identity);
            }
            Err(err) => {
                debug!("Session restore failed: {err}");
                // Clear before transitioning so the dead token never
                // outlives the state that justified keeping it
                self.store.clear()?;
                self.state = SessionState::Unauthenticated;
            }
        }

        Ok(&self.state)
    }

    /// Log in and persist the returned token.
    ///
    /// # Errors
    /// `Http` with status 401 for bad credentials; the session state is
    /// untouched on failure.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Identity, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        let response = fail_on_status(response).await?;
        let body: LoginResponse = response.json().await?;

        // Persist first, then transition
        self.store.save(&body.token)?;
        let identity = Identity {
            user_id: body.user_id,
            username: body.username,
        };
        self.state = SessionState::Authenticated(identity.clone());

        Ok(identity)
    }

    /// Register a new account. Registration never authenticates; the caller
    /// is expected to log in afterwards.
    ///
    /// # Errors
    /// `Http` with status 409 when the username is taken.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<i64, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/register"))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        let response = fail_on_status(response).await?;
        let body: RegisterResponse = response.json().await?;

        Ok(body.user_id)
    }

    /// Discard the persisted token unconditionally and end the session.
    ///
    /// # Errors
    /// Returns an error if the token store cannot be cleared.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.state = SessionState::Unauthenticated;
        Ok(())
    }

    /// Fetch the current user's profile through the authorized chokepoint.
    ///
    /// # Errors
    /// `NotAuthenticated` without a token, `SessionRejected` if the server
    /// answers 401 (the session is cleared before this returns).
    pub async fn get_profile(&mut self) -> Result<Profile, ClientError> {
        let request = self.request(Method::GET, "/api/auth/profile");
        let response = self.send_authorized(request).await?;
        let response = fail_on_status(response).await?;

        Ok(response.json().await?)
    }

    /// Build a request against the service; pair with [`send_authorized`]
    /// for protected endpoints, including downstream task API calls.
    ///
    /// [`send_authorized`]: SessionClient::send_authorized
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.endpoint(path))
    }

    /// Send a request with the bearer token attached.
    ///
    /// This is the cross-cutting 401 rule: whatever endpoint answers 401,
    /// the persisted token is discarded and the state drops to
    /// `Unauthenticated` before the caller sees the error.
    ///
    /// # Errors
    /// `NotAuthenticated` when no token is held; `SessionRejected` on 401.
    pub async fn send_authorized(
        &mut self,
        request: RequestBuilder,
    ) -> Result<Response, ClientError> {
        let token = self.store.load()?.ok_or(ClientError::NotAuthenticated)?;

        let response = request.bearer_auth(token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Session expired, logging out");
            self.store.clear()?;
            self.state = SessionState::Unauthenticated;
            return Err(ClientError::SessionRejected);
        }

        Ok(response)
    }

    async fn verify_token(&self, token: &str) -> Result<Identity, ClientError> {
        let response = self
            .http
            .post(self.endpoint("/api/auth/verify"))
            .bearer_auth(token)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::SessionRejected);
        }

        let response = fail_on_status(response).await?;
        let body: VerifyResponse = response.json().await?;
        if !body.valid {
            return Err(ClientError::SessionRejected);
        }

        Ok(Identity {
            user_id: body.user_id,
            username: body.username,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            path
        )
    }
}

/// Turn a non-success response into [`ClientError::Http`], extracting the
/// server's `{"error": ...}` message when there is one.
async fn fail_on_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_unknown() {
        assert_eq!(SessionState::default(), SessionState::Unknown);
    }

    #[test]
    fn endpoint_joins_base_and_path() -> Result<(), Box<dyn std::error::Error>> {
        let store = Arc::new(MemoryTokenStore::default());
        let client = SessionClient::new(Url::parse("http://127.0.0.1:8001/")?, store)?;

        assert_eq!(
            client.endpoint("/api/auth/login"),
            "http://127.0.0.1:8001/api/auth/login"
        );
        Ok(())
    }
}
