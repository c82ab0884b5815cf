//! Product models.
//!
//! Listings return [`ProductSummary`] (no description); the single-product
//! lookup returns [`ProductDetail`].

use serde::Serialize;

use brickexchange_core::{Price, ProductId, Quantity, StoreName};

/// Product as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub image_url: Option<String>,
    pub category: String,
    pub title: String,
    pub price: Price,
    pub quantity: Quantity,
}

/// Product with its full description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProductDetail {
    pub id: ProductId,
    pub image_url: Option<String>,
    pub category: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl From<&ProductDetail> for ProductSummary {
    fn from(product: &ProductDetail) -> Self {
        Self {
            id: product.id,
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            title: product.title.clone(),
            price: product.price,
            quantity: product.quantity,
        }
    }
}

/// A validated product to insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub store_name: StoreName,
    pub image_url: Option<String>,
    pub category: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub quantity: Quantity,
}

/// Partial update of a product. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub quantity: Option<Quantity>,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl ProductChanges {
    /// Resolve the changes against the currently stored product.
    #[must_use]
    pub fn apply_to(self, current: ProductDetail) -> ProductDetail {
        ProductDetail {
            id: current.id,
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            price: self.price.unwrap_or(current.price),
            quantity: self.quantity.unwrap_or(current.quantity),
            category: self.category.unwrap_or(current.category),
            image_url: self.image_url.or(current.image_url),
        }
    }

    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
    }
}
