//! Dispatch domain module.
//!
//! Dispatches fulfil sale invoices over time and are the only documents that
//! take ordered goods out of stock. Pure domain logic (no IO, no storage).

pub mod dispatch;
pub mod engine;

pub use dispatch::{Dispatch, FulfillmentLine, RejectedLine};
pub use engine::{CreateDispatch, DispatchEngine, DispatchOutcome};
