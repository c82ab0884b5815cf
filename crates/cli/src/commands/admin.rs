//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! bx-cli admin create -e admin@test.edu -p 'a long passphrase'
//! ```
//!
//! Accounts are the only way into the admin portal; the API has no
//! registration endpoint.

use thiserror::Error;

use brickexchange_core::Email;
use brickexchange_storefront::db::{PgDatastore, RepositoryError};
use brickexchange_storefront::services::auth::{AuthError, hash_password, validate_password};

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password rejected or could not be hashed.
    #[error("Password error: {0}")]
    Password(#[from] AuthError),

    /// Account already exists.
    #[error("Admin account already exists with email: {0}")]
    AccountExists(String),

    /// Database error while inserting.
    #[error("Database error: {0}")]
    Repository(RepositoryError),
}

/// Validate the inputs and produce the email and password hash to store.
///
/// # Errors
///
/// Returns `AdminError::InvalidEmail` or `AdminError::Password`.
pub fn prepare_account(email: &str, password: &str) -> Result<(Email, String), AdminError> {
    let email = Email::parse(email).map_err(|_| AdminError::InvalidEmail(email.to_owned()))?;
    validate_password(password)?;
    let hash = hash_password(password)?;
    Ok((email, hash))
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AdminError` if validation fails, the email is taken or the
/// database is unreachable.
pub async fn create_account(email: &str, password: &str) -> Result<i32, AdminError> {
    let (email, hash) = prepare_account(email, password)?;

    let pool = connect().await?;
    let datastore = PgDatastore::new(pool);

    tracing::info!("Creating admin account: {}", email);
    let id = datastore
        .create_admin(&email, &hash)
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::AccountExists(email.to_string()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Admin account created successfully! ID: {}, Email: {}", id, email);
    Ok(id.as_i32())
}
