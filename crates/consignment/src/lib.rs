//! Consignment domain module.
//!
//! Consignment moves stock out of the warehouse into a balance held per
//! (customer, product). It is tracked separately from sales and dispatches.

pub mod ledger;

pub use ledger::{ConsignmentEntry, ConsignmentLedger, TransferConsignment};
