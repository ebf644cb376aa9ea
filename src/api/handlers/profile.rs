use crate::api::error::{ApiError, ErrorBody};
use crate::api::handlers::extract_bearer_token;
use crate::auth::AuthState;
use axum::{extract::Extension, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path= "/api/auth/profile",
    responses (
        (status = 200, description = "Current user profile", body = [Profile], content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = [ErrorBody]),
        (status = 404, description = "User no longer exists", body = [ErrorBody]),
        (status = 500, description = "Failed to fetch profile", body = [ErrorBody]),
    ),
    security(("bearer" = [])),
    tag= "auth"
)]
// axum handler for profile
pub async fn profile(
    state: Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<Profile>, ApiError> {
    let token = extract_bearer_token(&headers).ok_or(ApiError::MissingCredentials)?;

    let claims = state.codec().verify(&token).map_err(|err| {
        debug!("Token verification failed: {err}");
        ApiError::InvalidToken
    })?;

    let user = state.store().find_by_id(claims.user_id).await.map_err(|err| {
        error!("Profile lookup failed: {err}");
        ApiError::Internal("Failed to fetch profile".to_string())
    })?;

    // A valid token does not guarantee the subject still exists
    let Some(user) = user else {
        return Err(ApiError::NotFound("User not found".to_string()));
    };

    Ok(Json(Profile {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::TimeZone;

    #[test]
    fn profile_serializes_created_at_as_rfc3339() -> Result<()> {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap();
        let profile = Profile {
            id: 3,
            username: "alice".to_string(),
            created_at,
        };
        let value = serde_json::to_value(&profile)?;

        assert_eq!(value["id"], 3);
        assert_eq!(value["username"], "alice");
        assert_eq!(value["created_at"], "2024-05-01T12:00:00Z");
        Ok(())
    }
}
