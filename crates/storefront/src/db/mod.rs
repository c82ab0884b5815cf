//! Data access for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `products` - Catalogue, grouped by lower-cased store name
//! - `admin_accounts` - Admin portal logins (argon2 hashes)
//! - `contact_messages` - Append-only contact form submissions
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! Handlers never touch the pool directly: they go through the [`Datastore`]
//! trait, implemented by [`PgDatastore`] in production and by
//! [`MemoryDatastore`] in tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p brickexchange-cli -- migrate
//! ```

pub mod admin_accounts;
pub mod contact_messages;
pub mod memory;
pub mod postgres;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use brickexchange_core::{ContactMessageId, Email, ProductId, StoreName};

use crate::models::{
    AdminAccount, Cart, NewContactMessage, NewProduct, ProductChanges, ProductDetail,
    ProductSummary,
};

pub use admin_accounts::AdminAccountRepository;
pub use contact_messages::ContactMessageRepository;
pub use memory::MemoryDatastore;
pub use postgres::PgDatastore;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage operations behind every endpoint.
///
/// Each call runs on one dedicated connection that is released when the call
/// returns, whatever the outcome.
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Check that storage is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// All products of a store.
    async fn list_products(&self, store: &StoreName)
    -> Result<Vec<ProductSummary>, RepositoryError>;

    /// One product by id, `None` when absent.
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError>;

    /// Products of a store in one category (exact, case-sensitive match).
    async fn list_products_by_category(
        &self,
        store: &StoreName,
        category: &str,
    ) -> Result<Vec<ProductSummary>, RepositoryError>;

    /// Distinct categories of a store.
    async fn list_categories(&self, store: &StoreName) -> Result<Vec<String>, RepositoryError>;

    /// Insert a product and return its id.
    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, RepositoryError>;

    /// Read the product, merge `changes` over it and write it back.
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn edit_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<ProductDetail, RepositoryError>;

    /// Delete a product. Deleting an absent product is not an error.
    async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError>;

    /// Look up an admin account by email.
    async fn find_admin(&self, email: &Email) -> Result<Option<AdminAccount>, RepositoryError>;

    /// Append a contact message.
    async fn insert_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError>;

    /// Decrement stock for every cart line, clamping each product at zero.
    ///
    /// Lines are applied in order without a surrounding transaction; a
    /// failure part-way leaves earlier lines applied.
    async fn apply_purchase(&self, cart: &Cart) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
