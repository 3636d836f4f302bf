use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, LineItem};

/// A shipment against a sale invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub number: String,
    pub invoice_number: String,
    pub date: NaiveDate,
    pub items: Vec<LineItem>,
}

/// A proposed dispatch line that was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// Zero-based position in the proposed item list.
    pub position: usize,
    pub item: LineItem,
    pub error: DomainError,
}

/// Ordered vs. dispatched totals for one product on one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentLine {
    pub product_code: String,
    pub ordered: i64,
    pub dispatched: i64,
}

impl FulfillmentLine {
    /// Quantity that may still be dispatched (never negative).
    pub fn remaining(&self) -> i64 {
        (self.ordered - self.dispatched).max(0)
    }
}
