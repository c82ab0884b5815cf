//! Session middleware configuration.
//!
//! Sessions live in a tower-sessions store (`PostgresStore` in production,
//! `MemoryStore` in tests). The cookie only carries the session id, signed
//! with the configured session secret.
//!
//! No expiry is set on the layer: a fresh session is a browser-session
//! cookie, and a successful admin login pins its own fixed expiry (see
//! [`crate::middleware::auth`]).

use secrecy::ExposeSecret;
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::service::SignedCookie;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::config::{ConfigError, StorefrontConfig};

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bx_session";

/// Session layer with signed cookies.
pub type SignedSessionLayer<S> = SessionManagerLayer<S, SignedCookie>;

/// Create the session layer over `store`.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` if the session secret cannot be used
/// as a signing key.
pub fn create_session_layer<S>(
    store: S,
    config: &StorefrontConfig,
) -> Result<SignedSessionLayer<S>, ConfigError>
where
    S: SessionStore + Clone,
{
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes()).map_err(|e| {
        ConfigError::InsecureSecret("STOREFRONT_SESSION_SECRET".to_string(), e.to_string())
    })?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
