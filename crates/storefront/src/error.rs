//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. The response is always JSON
//! `{"status_message": ...}`: client errors (400, or 429 when rate limited)
//! carry their message verbatim, server errors (500) carry a generic message
//! and are logged and captured to Sentry. The full detail rides along as an [`ErrorDetail`]
//! response extension for the debug logger in
//! [`crate::middleware::error_log`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::params::ParamError;
use crate::services::auth::AuthError;

/// Message returned for every server-side failure.
pub const SERVER_ERROR_MESSAGE: &str =
    "Something went wrong on the server, please try again later.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request parameter missing or invalid.
    #[error("{0}")]
    Param(#[from] ParamError),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Too many attempts from one client address.
    #[error("Too many login attempts, please try again later.")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is reported to the client as-is.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::Param(_) | Self::BadRequest(_) | Self::RateLimited => true,
            Self::Auth(err) => err.is_client_error(),
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => false,
        }
    }
}

/// Full error text attached to error responses.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let detail = self.to_string();

        let (status, message) = if matches!(self, Self::RateLimited) {
            (StatusCode::TOO_MANY_REQUESTS, detail.clone())
        } else if self.is_client_error() {
            (StatusCode::BAD_REQUEST, detail.clone())
        } else {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVER_ERROR_MESSAGE.to_string(),
            )
        };

        let mut response = (status, Json(json!({ "status_message": message }))).into_response();
        response.extensions_mut().insert(ErrorDetail(detail));
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an admin account ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Purchase submitted", Some(&[("lines", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
