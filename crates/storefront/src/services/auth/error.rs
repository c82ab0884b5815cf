//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No admin account for the submitted email.
    #[error("User does not exist.")]
    UserNotFound,

    /// The password does not match the stored hash.
    #[error("Invalid password.")]
    InvalidPassword,

    /// Password too weak to provision.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The stored hash is not a valid PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the error is the caller's fault rather than the server's.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound | Self::InvalidPassword | Self::WeakPassword(_)
        )
    }
}
