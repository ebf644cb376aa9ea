use crate::api::error::{ApiError, ErrorBody};
use crate::auth::AuthState;
use crate::store::StoreError;
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;

// No Debug on purpose: the payload carries a plaintext password
#[derive(ToSchema, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[utoipa::path(
    post,
    path= "/api/auth/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "Registration successful", body = [RegisterResponse], content_type = "application/json"),
        (status = 400, description = "Missing username or password", body = [ErrorBody]),
        (status = 409, description = "Username already exists", body = [ErrorBody]),
        (status = 500, description = "Registration failed", body = [ErrorBody]),
    ),
    tag= "auth"
)]
// axum handler for register
pub async fn register(
    state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<impl IntoResponse, ApiError> {
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

    let hash = state.hasher().hash(&request.password).await.map_err(|err| {
        error!("Password hashing failed: {err}");
        ApiError::Internal("Registration failed".to_string())
    })?;

    // No existence pre-check: the store's unique constraint arbitrates
    // concurrent registrations for the same username
    let user_id = match state.store().insert_user(&request.username, &hash).await {
        Ok(id) => id,
        Err(StoreError::UsernameTaken) => return Err(ApiError::Conflict),
        Err(err) => {
            error!("Registration insert failed: {err}");
            return Err(ApiError::Internal("Registration failed".to_string()));
        }
    };

    info!("User registered: {} (ID: {user_id})", request.username);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn register_response_uses_camel_case_user_id() -> Result<()> {
        let response = RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id: 7,
        };
        let value = serde_json::to_value(&response)?;

        assert_eq!(value["userId"], 7);
        assert!(value.get("user_id").is_none());
        Ok(())
    }
}
