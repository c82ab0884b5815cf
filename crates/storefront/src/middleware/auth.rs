//! Admin session guard.
//!
//! The admin portal has a single piece of session state: a boolean
//! `logged_in` flag. [`AdminSession`] is extracted per request and handed to
//! the handlers that need it; reading the flag has no side effects and only
//! [`AdminSession::log_in`] and [`AdminSession::log_out`] change it.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::{Expiry, Session};

use crate::error::AppError;
use crate::models::session_keys;

/// Lifetime of an authenticated session, counted from login.
pub const LOGIN_TTL: Duration = Duration::minutes(15);

/// The admin flag of the current session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(admin: AdminSession) -> Result<Json<Value>, AppError> {
///     Ok(Json(json!({ "logged_in": admin.is_logged_in().await? })))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession(Session);

impl AdminSession {
    /// Wrap a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Whether this session completed an admin login that has not expired
    /// or been logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn is_logged_in(&self) -> Result<bool, tower_sessions::session::Error> {
        Ok(self
            .0
            .get::<bool>(session_keys::LOGGED_IN)
            .await?
            .unwrap_or(false))
    }

    /// Mark the session authenticated, expiring [`LOGIN_TTL`] from now
    /// regardless of activity.
    ///
    /// The session id is rotated first so a pre-login id cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn log_in(&self) -> Result<(), tower_sessions::session::Error> {
        self.0.cycle_id().await?;
        self.0.insert(session_keys::LOGGED_IN, true).await?;
        self.0.set_expiry(Some(Expiry::AtDateTime(
            OffsetDateTime::now_utc() + LOGIN_TTL,
        )));
        Ok(())
    }

    /// Clear the authenticated flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn log_out(&self) -> Result<(), tower_sessions::session::Error> {
        self.0.insert(session_keys::LOGGED_IN, false).await
    }
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))
    }
}
