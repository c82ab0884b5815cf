//! Authentication service.
//!
//! Admin accounts log in with email and password. Hashes are argon2id PHC
//! strings, produced by `bx-cli admin create`.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use brickexchange_core::Email;

use crate::db::Datastore;
use crate::models::AdminAccount;

/// Minimum password length for new admin accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
pub struct AuthService<'a> {
    datastore: &'a dyn Datastore,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(datastore: &'a dyn Datastore) -> Self {
        Self { datastore }
    }

    /// Check admin credentials.
    ///
    /// An email that does not parse cannot belong to any account, so it is
    /// reported the same way as an unknown one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has this email.
    /// Returns `AuthError::InvalidPassword` if the password does not match.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminAccount, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::UserNotFound)?;

        let account = self
            .datastore
            .find_admin(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &account.password_hash)?;

        Ok(account)
    }
}

/// Validate a password for a new admin account.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidPassword` on mismatch and
/// `AuthError::MalformedHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::MalformedHash)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidPassword)
}
