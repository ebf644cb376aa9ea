use crate::api::error::{ApiError, ErrorBody};
use crate::api::handlers::extract_bearer_token;
use crate::auth::AuthState;
use axum::{extract::Extension, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: String,
}

#[utoipa::path(
    post,
    path= "/api/auth/verify",
    responses (
        (status = 200, description = "Token is valid", body = [VerifyResponse], content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = [ErrorBody]),
    ),
    security(("bearer" = [])),
    tag= "auth"
)]
// axum handler for verify
pub async fn verify(
    state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    let token = extract_bearer_token(&headers).ok_or(ApiError::MissingCredentials)?;

    // Pure function of the token and the shared secret; the credential store
    // is never consulted, so any trusting service can do exactly this
    let claims = state.codec().verify(&token).map_err(|err| {
        debug!("Token verification failed: {err}");
        ApiError::InvalidToken
    })?;

    Ok(Json(VerifyResponse {
        valid: true,
        user_id: claims.user_id,
        username: claims.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn verify_response_shape() -> Result<()> {
        let response = VerifyResponse {
            valid: true,
            user_id: 3,
            username: "alice".to_string(),
        };
        let value = serde_json::to_value(&response)?;

        assert_eq!(value["valid"], true);
        assert_eq!(value["userId"], 3);
        assert_eq!(value["username"], "alice");
        Ok(())
    }
}
