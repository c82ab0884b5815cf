//! Product repository.
//!
//! Queries are built at runtime with `sqlx::query_as` so the crate compiles
//! without a live database.

use sqlx::PgConnection;

use brickexchange_core::{ProductId, Quantity, StoreName};

use super::RepositoryError;
use crate::models::{NewProduct, ProductDetail, ProductSummary};

const SUMMARY_COLUMNS: &str = "id, image_url, category, title, price, quantity";
const DETAIL_COLUMNS: &str = "id, image_url, category, title, description, price, quantity";

/// Repository for product operations on a single connection.
pub struct ProductRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> ProductRepository<'c> {
    /// Create a repository bound to an acquired connection.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// List every product of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_store(
        &mut self,
        store: &StoreName,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let sql = format!("SELECT {SUMMARY_COLUMNS} FROM products WHERE store_name = $1 ORDER BY id");
        let products = sqlx::query_as::<_, ProductSummary>(&sql)
            .bind(store)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(products)
    }

    /// List products of a store in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_category(
        &mut self,
        store: &StoreName,
        category: &str,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM products WHERE store_name = $1 AND category = $2 ORDER BY id"
        );
        let products = sqlx::query_as::<_, ProductSummary>(&sql)
            .bind(store)
            .bind(category)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(products)
    }

    /// Distinct category labels of a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&mut self, store: &StoreName) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products WHERE store_name = $1 ORDER BY category",
        )
        .bind(store)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(categories)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&mut self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let sql = format!("SELECT {DETAIL_COLUMNS} FROM products WHERE id = $1");
        let product = sqlx::query_as::<_, ProductDetail>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(product)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&mut self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let id = sqlx::query_scalar::<_, ProductId>(
            r"
            INSERT INTO products (store_name, image_url, category, title, description, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            ",
        )
        .bind(&product.store_name)
        .bind(product.image_url.as_deref())
        .bind(&product.category)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .fetch_one(&mut *self.conn)
        .await?;
        Ok(id)
    }

    /// Overwrite every editable column of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matched.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&mut self, product: &ProductDetail) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET title = $1, description = $2, price = $3, quantity = $4, category = $5, image_url = $6
            WHERE id = $7
            ",
        )
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .bind(&product.category)
        .bind(product.image_url.as_deref())
        .bind(product.id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&mut self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Take `quantity` units out of stock, never going below zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn decrement_stock(
        &mut self,
        id: ProductId,
        quantity: Quantity,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET quantity = GREATEST(0, quantity - $1) WHERE id = $2")
            .bind(quantity)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}
