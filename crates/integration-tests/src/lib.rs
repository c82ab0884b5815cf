//! End-to-end tests for the BrickExchange storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p brickexchange-cli -- migrate
//!
//! # Provision the admin used by the login tests
//! cargo run -p brickexchange-cli -- admin create -e admin@test.edu -p 'integration-pass'
//!
//! # Start the server, then run the ignored tests
//! cargo run -p brickexchange-storefront &
//! cargo test -p brickexchange-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Server under test (default `http://localhost:8000`)
//! - `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD` - Provisioned admin account

use reqwest::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;

/// Store every test writes to, so runs never touch real catalogues.
pub const TEST_STORE: &str = "integration-tests";

/// Base URL of the storefront under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Admin credentials provisioned for the login tests.
#[must_use]
pub fn admin_credentials() -> (String, String) {
    (
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@test.edu".to_string()),
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "integration-pass".to_string()),
    )
}

/// HTTP client that keeps the session cookie and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `{status_message, success}` envelope.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status_message: String,
    pub success: bool,
}

/// The error body returned with 400 and 500 responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub status_message: String,
}

/// Find a product in a listing by title.
#[must_use]
pub fn find_by_title<'a>(products: &'a [Value], title: &str) -> Option<&'a Value> {
    products.iter().find(|p| p["title"] == title)
}
