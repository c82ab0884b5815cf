//! Debug logging of rejected requests.
//!
//! Server errors are always logged where they are converted (see
//! [`crate::error::AppError`]). With the debug flag on, client rejections are
//! logged too, with the full error text and the request they answered.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ErrorDetail;
use crate::middleware::request_id::RequestId;
use crate::state::AppState;

/// Log the [`ErrorDetail`] of client-error responses when debugging.
pub async fn log_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config().debug {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.extensions().get::<RequestId>().cloned();

    let response = next.run(request).await;

    if response.status().is_client_error()
        && let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>()
    {
        tracing::warn!(
            %method,
            path = %path,
            request_id = request_id.as_ref().map(|id| id.0.as_str()),
            status = response.status().as_u16(),
            detail = %detail,
            "Request rejected"
        );
    }

    response
}
