//! Business logic services for storefront.
//!
//! - `auth` - Admin password authentication (argon2)

pub mod auth;
