//! Products domain module.
//!
//! This crate contains the product catalog and its stock-quantity rules,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod product;

pub use catalog::ProductCatalog;
pub use product::{AUTO_CREATED_DESCRIPTION, Product};
