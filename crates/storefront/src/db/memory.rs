//! In-memory [`Datastore`] for tests and local experiments.
//!
//! Mirrors the `PostgreSQL` semantics the handlers rely on: store names are
//! already normalized by [`StoreName`], categories match exactly, purchase
//! decrements clamp at zero. [`MemoryDatastore::set_failing`] makes every
//! call return a database error.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use brickexchange_core::{AdminAccountId, ContactMessageId, Email, ProductId, StoreName};

use super::{Datastore, RepositoryError};
use crate::models::{
    AdminAccount, Cart, ContactMessage, NewContactMessage, NewProduct, ProductChanges,
    ProductDetail, ProductSummary,
};

#[derive(Debug, Clone)]
struct StoredProduct {
    store_name: StoreName,
    product: ProductDetail,
}

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<ProductId, StoredProduct>,
    admins: Vec<AdminAccount>,
    contact_messages: Vec<ContactMessage>,
    last_product_id: i32,
    last_admin_id: i32,
    last_message_id: i32,
}

/// Datastore kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryDatastore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryDatastore {
    /// Create an empty datastore.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    /// Register an admin account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    pub async fn create_admin(
        &self,
        email: Email,
        password_hash: String,
    ) -> Result<AdminAccountId, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        if tables.admins.iter().any(|admin| admin.email == email) {
            return Err(RepositoryError::Conflict(
                "admin account already exists".to_string(),
            ));
        }
        tables.last_admin_id += 1;
        let id = AdminAccountId::new(tables.last_admin_id);
        tables.admins.push(AdminAccount {
            id,
            email,
            password_hash,
        });
        Ok(id)
    }

    /// Snapshot of the stored contact messages, oldest first.
    pub async fn contact_messages(&self) -> Vec<ContactMessage> {
        self.tables.lock().await.contact_messages.clone()
    }

    /// Number of stored products across all stores.
    pub async fn product_count(&self) -> usize {
        self.tables.lock().await.products.len()
    }
}

fn summaries<'a>(products: impl Iterator<Item = &'a StoredProduct>) -> Vec<ProductSummary> {
    products
        .map(|stored| ProductSummary::from(&stored.product))
        .collect()
}

#[async_trait]
impl Datastore for MemoryDatastore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check()
    }

    async fn list_products(
        &self,
        store: &StoreName,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(summaries(
            tables
                .products
                .values()
                .filter(|stored| &stored.store_name == store),
        ))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables.products.get(&id).map(|stored| stored.product.clone()))
    }

    async fn list_products_by_category(
        &self,
        store: &StoreName,
        category: &str,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(summaries(tables.products.values().filter(|stored| {
            &stored.store_name == store && stored.product.category == category
        })))
    }

    async fn list_categories(&self, store: &StoreName) -> Result<Vec<String>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().await;
        let mut categories: Vec<String> = tables
            .products
            .values()
            .filter(|stored| &stored.store_name == store)
            .map(|stored| stored.product.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        tables.last_product_id += 1;
        let id = ProductId::new(tables.last_product_id);
        tables.products.insert(
            id,
            StoredProduct {
                store_name: product.store_name.clone(),
                product: ProductDetail {
                    id,
                    image_url: product.image_url.clone(),
                    category: product.category.clone(),
                    title: product.title.clone(),
                    description: product.description.clone(),
                    price: product.price,
                    quantity: product.quantity,
                },
            },
        );
        Ok(id)
    }

    async fn edit_product(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<ProductDetail, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let stored = tables
            .products
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        let updated = changes.apply_to(stored.product.clone());
        stored.product = updated.clone();
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.check()?;
        self.tables.lock().await.products.remove(&id);
        Ok(())
    }

    async fn find_admin(&self, email: &Email) -> Result<Option<AdminAccount>, RepositoryError> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .admins
            .iter()
            .find(|admin| &admin.email == email)
            .cloned())
    }

    async fn insert_contact_message(
        &self,
        message: &NewContactMessage,
    ) -> Result<ContactMessageId, RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        tables.last_message_id += 1;
        let id = ContactMessageId::new(tables.last_message_id);
        tables.contact_messages.push(ContactMessage {
            id,
            store_name: message.store_name.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn apply_purchase(&self, cart: &Cart) -> Result<(), RepositoryError> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        for line in cart.lines() {
            if let Some(stored) = tables.products.get_mut(&line.product_id) {
                stored.product.quantity = stored.product.quantity.saturating_sub(line.quantity);
            }
        }
        Ok(())
    }
}
