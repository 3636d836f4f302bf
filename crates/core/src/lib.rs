//! `stockledger-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error model, the entity trait, the keyed registry used by the
//! catalogs, document lines and sequential numbering.

pub mod entity;
pub mod error;
pub mod line;
pub mod numbering;
pub mod registry;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use line::{LineItem, tally};
pub use numbering::next_number;
pub use registry::Registry;
