use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    status: String,
    service: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Service is up", body = [Health])
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health() -> impl IntoResponse {
    Json(Health {
        status: "healthy".to_string(),
        service: "auth-service".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn health_body_shape() -> Result<()> {
        let health = Health {
            status: "healthy".to_string(),
            service: "auth-service".to_string(),
        };
        let value = serde_json::to_value(&health)?;

        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], "auth-service");
        Ok(())
    }
}
