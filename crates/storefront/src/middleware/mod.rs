//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record on span, echo in response)
//! 4. Security headers
//! 5. Session layer (tower-sessions, signed `bx_session` cookie)
//! 6. Error detail logging (debug flag)
//!
//! Rate limiting is applied per route (`/admin/login` only).

pub mod auth;
pub mod error_log;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::AdminSession;
pub use error_log::log_error_detail;
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
