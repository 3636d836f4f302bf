//! Invoicing domain module.
//!
//! Purchase invoices bring stock into the warehouse; sale invoices record what
//! a customer ordered and are fulfilled later by dispatches. Pure domain logic
//! (no IO, no storage).

pub mod invoice;
pub mod ledger;

pub use invoice::{Invoice, InvoiceKind};
pub use ledger::{InvoiceLedger, RecordPurchase, RecordSale};
