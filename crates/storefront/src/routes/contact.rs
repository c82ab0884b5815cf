//! Contact form route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::models::NewContactMessage;
use crate::params::Params;
use crate::routes::StatusResponse;
use crate::state::AppState;

/// Leave a message for a store.
///
/// POST /contact
///
/// The email is stored as given; it is only used by a person replying.
#[instrument(skip(state, params))]
pub async fn submit(
    State(state): State<AppState>,
    params: Params,
) -> Result<Json<StatusResponse>> {
    const MISSING: &str = "Missing POST parameter: store name, email, and/or message.";

    params.require(&["store_name", "email", "message"], MISSING)?;
    let message = NewContactMessage {
        store_name: params.store_name(MISSING)?,
        email: params.required_text("email", MISSING)?,
        message: params.required_text("message", MISSING)?,
    };

    let id = state.datastore().insert_contact_message(&message).await?;
    tracing::info!(message_id = %id, store = %message.store_name, "Contact message stored");

    Ok(StatusResponse::success("Successfully sent message!"))
}
