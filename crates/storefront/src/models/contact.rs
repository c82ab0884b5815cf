//! Contact form messages.

use chrono::{DateTime, Utc};

use brickexchange_core::{ContactMessageId, StoreName};

/// A validated contact form submission, ready to be stored.
#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub store_name: StoreName,
    pub email: String,
    pub message: String,
}

/// A stored contact message, as kept by the in-memory datastore.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub store_name: StoreName,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
