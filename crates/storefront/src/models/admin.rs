//! Admin account model.

use brickexchange_core::{AdminAccountId, Email};

/// An administrator allowed to log into the admin portal.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, sqlx::FromRow)]
pub struct AdminAccount {
    pub id: AdminAccountId,
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
