//! BrickExchange Core - Shared domain types.
//!
//! This crate provides the types used across all BrickExchange components:
//! - `storefront` - The JSON API server consumed by the client page scripts
//! - `cli` - Command-line tools for migrations, admin provisioning and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, store names, prices, quantities and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
