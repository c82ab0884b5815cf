//! Catalogue route handlers.
//!
//! Store names are matched case-insensitively (normalized by
//! [`StoreName`](brickexchange_core::StoreName)); categories match exactly.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::models::{ProductDetail, ProductSummary};
use crate::params::Params;
use crate::state::AppState;

const MISSING_STORE: &str = "Missing GET parameter: store name.";

/// One entry of the category listing.
#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub category: String,
}

/// Products of a store.
///
/// GET /products?store_name=...
#[instrument(skip(state, params))]
pub async fn list(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<Vec<ProductSummary>>> {
    let store = params.store_name(MISSING_STORE)?;
    let products = state.datastore().list_products(&store).await?;
    Ok(Json(products))
}

/// One product, or `null` when there is no such id.
///
/// GET /product?product_id=...
#[instrument(skip(state, params))]
pub async fn show(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<Option<ProductDetail>>> {
    let id = params.product_id(
        "Missing GET parameter: product_id.",
        "Invalid GET parameter: product_id.",
    )?;
    let product = state.datastore().get_product(id).await?;
    Ok(Json(product))
}

/// Products of a store in one category.
///
/// GET /products/category?store_name=...&category=...
#[instrument(skip(state, params))]
pub async fn by_category(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<Vec<ProductSummary>>> {
    const MISSING: &str = "Missing GET parameter: store name and category.";

    params.require(&["store_name", "category"], MISSING)?;
    let store = params.store_name(MISSING)?;
    let category = params.required_text("category", MISSING)?;

    let products = state
        .datastore()
        .list_products_by_category(&store, &category)
        .await?;
    Ok(Json(products))
}

/// Distinct categories of a store.
///
/// GET /categories?store_name=...
#[instrument(skip(state, params))]
pub async fn categories(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<Vec<CategoryEntry>>> {
    let store = params.store_name(MISSING_STORE)?;
    let categories = state
        .datastore()
        .list_categories(&store)
        .await?
        .into_iter()
        .map(|category| CategoryEntry { category })
        .collect();
    Ok(Json(categories))
}
