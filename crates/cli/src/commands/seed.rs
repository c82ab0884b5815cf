//! Catalogue seeding.
//!
//! Reads a YAML catalogue and inserts every product through the storefront
//! datastore.
//!
//! ```yaml
//! products:
//!   - store_name: BrickExchange
//!     title: Millennium Falcon
//!     description: Ultimate collector series.
//!     category: Star Wars
//!     price: 799.99
//!     quantity: 2
//!     image_url: https://cdn.rebrickable.com/media/sets/75192-1.jpg
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use brickexchange_core::{Price, Quantity, StoreName};
use brickexchange_storefront::db::{Datastore, PgDatastore, RepositoryError};
use brickexchange_storefront::models::NewProduct;

use super::{ConnectError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid catalogue: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Entry `index` (zero-based) failed validation.
    #[error("Product #{index}: {reason}")]
    InvalidProduct { index: usize, reason: String },

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Catalogue {
    products: Vec<SeedProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedProduct {
    store_name: String,
    title: String,
    description: String,
    category: String,
    price: Price,
    quantity: Quantity,
    #[serde(default)]
    image_url: Option<String>,
}

impl SeedProduct {
    fn into_new_product(self, index: usize) -> Result<NewProduct, SeedError> {
        let invalid = |reason: &str| SeedError::InvalidProduct {
            index,
            reason: reason.to_owned(),
        };

        let store_name =
            StoreName::parse(&self.store_name).map_err(|e| invalid(&e.to_string()))?;
        let title = non_blank(self.title).ok_or_else(|| invalid("title is blank"))?;
        let description =
            non_blank(self.description).ok_or_else(|| invalid("description is blank"))?;
        let category = non_blank(self.category).ok_or_else(|| invalid("category is blank"))?;

        Ok(NewProduct {
            store_name,
            image_url: self.image_url.and_then(non_blank),
            category,
            title,
            description,
            price: self.price,
            quantity: self.quantity,
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parse and validate a catalogue document.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed YAML (including negative prices
/// or quantities) and `SeedError::InvalidProduct` for blank fields.
fn parse_catalogue(source: &str) -> Result<Vec<NewProduct>, SeedError> {
    let catalogue: Catalogue = serde_yaml::from_str(source)?;
    catalogue
        .products
        .into_iter()
        .enumerate()
        .map(|(index, product)| product.into_new_product(index))
        .collect()
}

/// Insert every product of the catalogue at `file`.
///
/// The whole file is validated before anything is written.
///
/// # Errors
///
/// Returns `SeedError` if the file cannot be read or parsed, an entry is
/// invalid, or an insert fails.
pub async fn products(file: &Path) -> Result<(), SeedError> {
    let source = std::fs::read_to_string(file).map_err(|source| SeedError::Io {
        path: file.display().to_string(),
        source,
    })?;
    let products = parse_catalogue(&source)?;

    let datastore = PgDatastore::new(connect().await?);

    tracing::info!("Seeding {} products...", products.len());
    for product in &products {
        let id = datastore.create_product(product).await?;
        tracing::debug!(%id, store = %product.store_name, title = %product.title, "Inserted product");
    }

    tracing::info!("Seeded {} products", products.len());
    Ok(())
}
