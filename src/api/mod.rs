//! HTTP surface of the auth service.
//!
//! Requests are handled statelessly: the only shared pieces are the bounded
//! connection pool and the immutable [`AuthState`], so any number of
//! instances can run side by side without coordination.

use crate::auth::{AuthConfig, AuthState};
use crate::store::PgCredentialStore;
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Extension, Router,
};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod error;
pub(crate) mod handlers;
mod openapi;

pub use openapi::openapi;

/// Build the router with all routes and middleware wired.
///
/// Takes the state explicitly so tests can run the exact production stack
/// against an in-memory store.
#[must_use]
pub fn router(state: Arc<AuthState>) -> Router {
    // The frontend sends credentialed requests from its own origin, so the
    // allowed origin mirrors the request instead of using a wildcard
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/auth/register", post(handlers::register::register))
        .route("/api/auth/login", post(handlers::login::login))
        .route("/api/auth/verify", post(handlers::verify::verify))
        .route("/api/auth/profile", get(handlers::profile::profile))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state)),
        )
}

/// Connect to the database and start the server
/// # Errors
/// Return error if failed to connect to the database or start the server
pub async fn new(port: u16, dsn: &str, secret: &SecretString) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(10)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn)
        .await
        .context("Failed to connect to database")?;

    let store = Arc::new(PgCredentialStore::new(pool));
    let state = Arc::new(AuthState::new(AuthConfig::new(), secret, store));

    serve(port, state).await
}

/// Start the server
/// # Errors
/// Return error if failed to bind the listener or serve requests
pub async fn serve(port: u16, state: Arc<AuthState>) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
