//! Domain models for the storefront API.

pub mod admin;
pub mod cart;
pub mod contact;
pub mod product;
pub mod session;

pub use admin::AdminAccount;
pub use cart::{Cart, CartLine};
pub use contact::{ContactMessage, NewContactMessage};
pub use product::{NewProduct, ProductChanges, ProductDetail, ProductSummary};
pub use session::session_keys;
