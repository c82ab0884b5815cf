//! Contact message repository (append-only).

use sqlx::PgConnection;

use brickexchange_core::ContactMessageId;

use super::RepositoryError;
use crate::models::NewContactMessage;

/// Repository for contact messages on a single connection.
pub struct ContactMessageRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ContactMessageRepository<'c> {
    /// Create a repository bound to an acquired connection.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Store a contact message.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &mut self,
        message: &NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ContactMessageId>(
            "INSERT INTO contact_messages (store_name, email, msg) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&message.store_name)
        .bind(&message.email)
        .bind(&message.message)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(id)
    }
}
