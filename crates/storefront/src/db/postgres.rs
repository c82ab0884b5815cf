//! `PostgreSQL`-backed [`Datastore`].

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::pool::PoolConnection;
use sqlx::postgres::Postgres;
use tracing::instrument;

use brickexchange_core::{AdminAccountId, ContactMessageId, Email, ProductId, StoreName};

use super::{
    AdminAccountRepository, ContactMessageRepository, Datastore, ProductRepository,
    RepositoryError,
};
use crate::models::{
    AdminAccount, Cart, NewContactMessage, NewProduct, ProductChanges, ProductDetail,
    ProductSummary,
};

/// Datastore over a connection pool.
///
/// Every method acquires its own pooled connection. The connection goes back
/// to the pool when it is dropped at the end of the call.
#[derive(Clone)]
pub struct PgDatastore {
    pool: PgPool,
}

impl PgDatastore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn acquire(&self) -> Result<PoolConnection<Postgres>, RepositoryError> {
        Ok(self.pool.acquire().await?)
    }

    /// Insert an admin account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create_admin(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<AdminAccountId, RepositoryError> {
        let mut conn = self.acquire().await?;
        AdminAccountRepository::new(&mut conn)
            .create(email, password_hash)
            .await
    }
}

#[async_trait]
impl Datastore for PgDatastore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self, store), fields(store = %store))]
    async fn list_products(
        &self,
        store: &StoreName,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let mut conn = self.acquire().await?;
        ProductRepository::new(&mut conn).list_by_store(store).await
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let mut conn = self.acquire().await?;
        ProductRepository::new(&mut conn).get(id).await
    }

    #[instrument(skip(self, store), fields(store = %store))]
    async fn list_products_by_category(
        &self,
        store: &StoreName,
        category: &str,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let mut conn = self.acquire().await?;
        ProductRepository::new(&mut conn)
            .list_by_category(store, category)
            .await
    }

    #[instrument(skip(self, store), fields(store = %store))]
    async fn list_categories(&self, store: &StoreName) -> Result<Vec<String>, RepositoryError> {
        let mut conn = self.acquire().await?;
        ProductRepository::new(&mut conn).categories(store).await
    }

    #[instrument(skip(self, product), fields(store = %product.store_name))]
    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let mut conn = self.acquire().await?;
        ProductRepository::new(&mut conn).create(product).await
    }

    #[instrument(skip(self, changes))]
    async fn edit_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<ProductDetail, RepositoryError> {
        let mut conn = self.acquire().await?;
        let mut products = ProductRepository::new(&mut conn);

        let current = products.get(id).await?.ok_or(RepositoryError::NotFound)?;
        let updated = changes.apply_to(current);
        products.update(&updated).await?;
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut conn = self.acquire().await?;
        let deleted = ProductRepository::new(&mut conn).delete(id).await?;
        if !deleted {
            tracing::debug!(product_id = %id, "delete matched no product");
        }
        Ok(())
    }

    #[instrument(skip(self, email))]
    async fn find_admin(&self, email: &Email) -> Result<Option<AdminAccount>, RepositoryError> {
        let mut conn = self.acquire().await?;
        AdminAccountRepository::new(&mut conn)
            .get_by_email(email)
            .await
    }

    #[instrument(skip(self, message), fields(store = %message.store_name))]
    async fn insert_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError> {
        let mut conn = self.acquire().await?;
        ContactMessageRepository::new(&mut conn)
            .insert(message)
            .await
    }

    #[instrument(skip(self, cart), fields(lines = cart.lines().len()))]
    async fn apply_purchase(&self, cart: &Cart) -> Result<(), RepositoryError> {
        if cart.is_empty() {
            return Ok(());
        }

        let mut conn = self.acquire().await?;
        let mut products = ProductRepository::new(&mut conn);
        for line in cart.lines() {
            products
                .decrement_stock(line.product_id, line.quantity)
                .await?;
        }
        Ok(())
    }
}
