//! Admin account repository.

use sqlx::PgConnection;

use brickexchange_core::{AdminAccountId, Email};

use super::{RepositoryError, conflict_on_unique};
use crate::models::AdminAccount;

/// Repository for admin account operations on a single connection.
pub struct AdminAccountRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> AdminAccountRepository<'c> {
    /// Create a repository bound to an acquired connection.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Get an admin account by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails or a stored
    /// email no longer parses.
    pub async fn get_by_email(
        &mut self,
        email: &Email,
    ) -> Result<Option<AdminAccount>, RepositoryError> {
        let account = sqlx::query_as::<_, AdminAccount>(
            "SELECT id, email, password_hash FROM admin_accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(account)
    }

    /// Insert an admin account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &mut self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccountId, RepositoryError> {
        sqlx::query_scalar::<_, AdminAccountId>(
            "INSERT INTO admin_accounts (email, password_hash) VALUES ($1, $2) RETURNING id",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| conflict_on_unique(e, "admin account"))
    }
}
