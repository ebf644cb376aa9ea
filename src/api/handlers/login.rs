use crate::api::error::{ApiError, ErrorBody};
use crate::auth::AuthState;
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};
use utoipa::ToSchema;

// No Debug on purpose: the payload carries a plaintext password
#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: String,
}

#[utoipa::path(
    post,
    path= "/api/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = [LoginResponse], content_type = "application/json"),
        (status = 400, description = "Missing username or password", body = [ErrorBody]),
        (status = 401, description = "Invalid credentials", body = [ErrorBody]),
        (status = 500, description = "Login failed", body = [ErrorBody]),
    ),
    tag= "auth"
)]
// axum handler for login
pub async fn login(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::Validation(
            "Username and password required".to_string(),
        ));
    };

    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password required".to_string(),
        ));
    }

    debug!("Login attempt for user: {}", request.username);

    let user = state
        .store()
        .find_by_username(&request.username)
        .await
        .map_err(|err| {
            error!("Login lookup failed: {err}");
            ApiError::Internal("Login failed".to_string())
        })?;

    // Unknown user and wrong password fall through to the same response
    let Some(user) = user else {
        debug!("Login failed: user not found: {}", request.username);
        return Err(ApiError::Authentication);
    };

    let valid = state
        .hasher()
        .verify(&request.password, &user.password_hash)
        .await
        .map_err(|err| {
            error!("Password verification failed: {err}");
            ApiError::Internal("Login failed".to_string())
        })?;

    if !valid {
        debug!("Login failed: invalid password for user: {}", user.username);
        return Err(ApiError::Authentication);
    }

    let token = state
        .codec()
        .issue(user.id, &user.username, state.token_ttl())
        .map_err(|err| {
            error!("Token issuance failed: {err}");
            ApiError::Internal("Login failed".to_string())
        })?;

    info!("Login successful for user: {} (ID: {})", user.username, user.id);

    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn login_response_shape() -> Result<()> {
        let response = LoginResponse {
            token: "abc.def.ghi".to_string(),
            user_id: 3,
            username: "alice".to_string(),
        };
        let value = serde_json::to_value(&response)?;

        assert_eq!(value["token"], "abc.def.ghi");
        assert_eq!(value["userId"], 3);
        assert_eq!(value["username"], "alice");
        Ok(())
    }
}
