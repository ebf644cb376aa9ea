//! `OpenAPI` document for the auth API.
//!
//! Every documented endpoint carries a `#[utoipa::path]` annotation; this
//! module aggregates them. The `openapi` binary prints the generated spec.

use crate::api::error::ErrorBody;
use crate::api::handlers::{health, login, profile, register, verify};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        register::register,
        login::login,
        verify::verify,
        profile::profile,
    ),
    components(schemas(
        health::Health,
        register::RegisterRequest,
        register::RegisterResponse,
        login::LoginRequest,
        login::LoginResponse,
        verify::VerifyResponse,
        profile::Profile,
        ErrorBody,
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "auth", description = "Credential lifecycle: register, login, verify, profile"),
        (name = "health", description = "Service liveness"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn document_covers_every_route() -> Result<()> {
        let doc = openapi();
        let json = serde_json::to_value(&doc)?;
        let paths = json
            .get("paths")
            .and_then(|paths| paths.as_object())
            .context("missing paths")?;

        for path in [
            "/health",
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/verify",
            "/api/auth/profile",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
        Ok(())
    }
}
