//! BrickExchange storefront library.
//!
//! The JSON API behind the BrickExchange client pages, as a library so the
//! router can be driven in tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod params;
pub mod routes;
pub mod services;
pub mod state;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::session::SignedSessionLayer;
use crate::state::AppState;

/// Assemble the full application router.
///
/// The session layer is passed in so production can back it with
/// `PostgresStore` while tests use `MemoryStore`. Any path that is not an API
/// route is served from the static client directory.
pub fn build_app<S>(state: AppState, session_layer: SignedSessionLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let static_files = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .fallback_service(static_files)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::log_error_detail,
        ))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.datastore().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    use axum::Router;
    use secrecy::SecretString;
    use tower_sessions::MemoryStore;

    use crate::config::StorefrontConfig;
    use crate::db::MemoryDatastore;
    use crate::middleware::create_session_layer;
    use crate::state::AppState;

    /// 64 characters, no placeholder words, plenty of entropy.
    const TEST_SESSION_SECRET: &str =
        "k3J9vQ2mX7pL4wR8tY1nB6cZ0sD5fG2hJ8kM3qW7eR4tY9uI1oP6aS0dF5gH2jK7";

    pub fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/brickexchange_test".to_string()),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8000,
            base_url: "http://localhost:8000".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET.to_string()),
            static_dir: "public".into(),
            debug: true,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Full router over an in-memory datastore and session store.
    #[allow(clippy::expect_used)]
    pub fn test_app(datastore: Arc<MemoryDatastore>) -> Router {
        let config = test_config();
        let session_layer = create_session_layer(MemoryStore::default(), &config)
            .expect("test session secret is a valid key");
        crate::build_app(AppState::new(config, datastore), session_layer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryDatastore;
    use crate::test_support::test_app;

    async fn status_of(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(Arc::new(MemoryDatastore::new()));
        assert_eq!(status_of(app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_follows_datastore() {
        let datastore = Arc::new(MemoryDatastore::new());
        let app = test_app(datastore.clone());
        assert_eq!(status_of(app.clone(), "/health/ready").await, StatusCode::OK);

        datastore.set_failing(true);
        assert_eq!(
            status_of(app, "/health/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_api_responses_carry_request_id_and_headers() {
        let app = test_app(Arc::new(MemoryDatastore::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/products?store_name=brickexchange")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }
}
