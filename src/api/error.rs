//! Error taxonomy for the HTTP surface.
//!
//! Every domain failure is caught at the request boundary and mapped here to
//! a status code and a minimal `{"error": ...}` body. Internal detail stays
//! in the logs; callers only ever see the public message.

use crate::auth::token::TokenError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error body shared by every failing endpoint.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or empty input the client can fix.
    #[error("{0}")]
    Validation(String),
    /// Username already registered.
    #[error("Username already exists")]
    Conflict,
    /// Bad credentials. The message is identical for unknown-user and
    /// wrong-password so login never leaks which one it was.
    #[error("Invalid credentials")]
    Authentication,
    /// No bearer token in the request.
    #[error("No token provided")]
    MissingCredentials,
    /// Token expired, tampered, or unparseable. Collapsed into one message;
    /// the distinction only matters in logs.
    #[error("Invalid token")]
    InvalidToken,
    /// Token was valid but the subject no longer exists.
    #[error("{0}")]
    NotFound(String),
    /// Unexpected store or codec failure. Carries the public message only;
    /// the cause is logged where it happened.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Authentication | Self::MissingCredentials | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(_: TokenError) -> Self {
        Self::InvalidToken
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
