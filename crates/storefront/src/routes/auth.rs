//! Admin session route handlers.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Serialize;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::AdminSession;
use crate::params::Params;
use crate::routes::StatusResponse;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Response of `/admin/isloggedin`.
#[derive(Debug, Serialize)]
pub struct LoginStatus {
    pub logged_in: bool,
}

/// Email/password login.
///
/// POST /admin/login
#[instrument(skip(state, admin, params))]
pub async fn login(
    State(state): State<AppState>,
    admin: AdminSession,
    params: Params,
) -> Result<Json<StatusResponse>> {
    const MISSING: &str = "Missing POST parameters: email and/or password.";

    params.require(&["email", "password"], MISSING)?;
    let email = params.required_text("email", MISSING)?;
    // Passwords are taken as typed, without trimming.
    let password = params
        .value("password")
        .and_then(|v| v.as_str().map(ToString::to_string))
        .or_else(|| params.text("password"))
        .unwrap_or_default();

    let account = AuthService::new(state.datastore())
        .login_with_password(&email, &password)
        .await?;

    admin.log_in().await?;
    set_sentry_user(&account.id, Some(account.email.as_str()));
    tracing::info!(admin_id = %account.id, "Admin logged in");

    Ok(StatusResponse::success("Successfully logged into admin portal!"))
}

/// Clear the admin flag and send the browser home.
///
/// GET /admin/logout
#[instrument(skip(admin))]
pub async fn logout(admin: AdminSession) -> Result<impl IntoResponse> {
    admin.log_out().await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

/// Whether the current session is logged in.
///
/// GET /admin/isloggedin
#[instrument(skip(admin))]
pub async fn is_logged_in(admin: AdminSession) -> Result<Json<LoginStatus>> {
    Ok(Json(LoginStatus {
        logged_in: admin.is_logged_in().await?,
    }))
}
