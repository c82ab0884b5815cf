//! Checkout of a client-side cart.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::params::Params;
use crate::routes::StatusResponse;
use crate::state::AppState;

/// Take every cart line out of stock.
///
/// POST /purchase
///
/// `cart` maps product ids to quantities, as a JSON object or a string
/// holding one. Each product's stock is decremented and clamped at zero;
/// unknown ids are skipped.
#[instrument(skip(state, params))]
pub async fn purchase(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<StatusResponse>> {
    let cart = params.cart()?;

    let lines = cart.lines().len().to_string();
    add_breadcrumb("checkout", "Purchase submitted", Some(&[("lines", &lines)]));

    state.datastore().apply_purchase(&cart).await?;
    tracing::info!(lines = cart.lines().len(), "Purchase applied");

    Ok(StatusResponse::success("Successfully purchased items!"))
}
