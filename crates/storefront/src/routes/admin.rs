//! Admin catalogue route handlers.
//!
//! These endpoints do not check the admin session; the admin pages gate
//! themselves on `/admin/isloggedin`.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, ProductChanges};
use crate::params::{ParamError, Params};
use crate::routes::StatusResponse;
use crate::state::AppState;

const MISSING_PRODUCT_ID: &str = "Missing POST parameter: product id.";
const INVALID_PRODUCT_ID: &str = "Invalid POST parameter: product id.";

/// Add a product to a store.
///
/// POST /admin/product/create
///
/// Required: `store_name`, `title`, `description`, `price`, `quantity`,
/// `category`. Optional: `image_url`.
#[instrument(skip(state, params))]
pub async fn create_product(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<StatusResponse>> {
    const MISSING: &str = "Missing POST parameter: store name, title, description, \
                           price, quantity, and/or category.";

    params.require(
        &["store_name", "title", "description", "price", "quantity", "category"],
        MISSING,
    )?;

    let quantity = params
        .quantity("quantity")?
        .ok_or(ParamError::Missing(MISSING))?;
    let price = params.price("price")?.ok_or(ParamError::Missing(MISSING))?;

    // The envelope echoes the store name as submitted.
    let submitted_store = params.required_text("store_name", MISSING)?;
    let product = NewProduct {
        store_name: params.store_name(MISSING)?,
        image_url: params.text("image_url"),
        category: params.required_text("category", MISSING)?,
        title: params.required_text("title", MISSING)?,
        description: params.required_text("description", MISSING)?,
        price,
        quantity,
    };

    let id = state.datastore().create_product(&product).await?;
    tracing::info!(product_id = %id, store = %product.store_name, "Product created");

    Ok(StatusResponse::success(format!(
        "Request to add {} to {submitted_store} successfully processed!",
        product.title
    )))
}

/// Partially update a product. Omitted fields keep their stored value.
///
/// POST /admin/product/edit
///
/// Required: `product_id`. Optional: `title`, `description`, `price`,
/// `quantity`, `category`, `image_url`.
#[instrument(skip(state, params))]
pub async fn edit_product(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<StatusResponse>> {
    let id = params.product_id(MISSING_PRODUCT_ID, INVALID_PRODUCT_ID)?;

    let changes = ProductChanges {
        title: params.text("title"),
        description: params.text("description"),
        price: params.price("price")?,
        quantity: params.quantity("quantity")?,
        category: params.text("category"),
        image_url: params.text("image_url"),
    };

    if changes.is_empty() {
        tracing::debug!(product_id = %id, "Edit without changes");
    }

    match state.datastore().edit_product(id, changes).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return Err(AppError::BadRequest(format!("Product {id} does not exist.")));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(StatusResponse::success(format!(
        "Request to edit product {id} successfully processed!"
    )))
}

/// Remove a product. Removing an absent product still succeeds.
///
/// POST /admin/product/delete
#[instrument(skip(state, params))]
pub async fn delete_product(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<StatusResponse>> {
    let id = params.product_id(MISSING_PRODUCT_ID, INVALID_PRODUCT_ID)?;
    state.datastore().delete_product(id).await?;

    Ok(StatusResponse::success(format!(
        "Request to delete product {id} successfully processed!"
    )))
}
