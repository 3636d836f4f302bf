//! Parties domain module (customers).
//!
//! Customers are referenced by code from invoices and consignments; the ledgers
//! only ever read them.

pub mod customer;

pub use customer::{Customer, CustomerChanges, CustomerRegistry};
