//! Dispatch engine: turns sale-invoice orders into stock-reducing shipments.
//!
//! Each proposed line is validated on its own. Lines that would exceed what is
//! still owed on the invoice, or what is on hand, are rejected individually
//! while the remaining lines go through.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use stockledger_core::{DomainError, DomainResult, LineItem, next_number, tally};
use stockledger_invoicing::{Invoice, InvoiceLedger};
use stockledger_products::ProductCatalog;

use crate::dispatch::{Dispatch, FulfillmentLine, RejectedLine};

/// Command: CreateDispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDispatch {
    pub invoice_number: String,
    pub items: Vec<LineItem>,
    pub date: NaiveDate,
}

/// Result of a dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The recorded dispatch, or `None` when no line was accepted.
    pub dispatch: Option<Dispatch>,
    pub rejected: Vec<RejectedLine>,
}

impl DispatchOutcome {
    pub fn is_recorded(&self) -> bool {
        self.dispatch.is_some()
    }
}

/// All dispatches in creation order.
#[derive(Debug, Clone, Default)]
pub struct DispatchEngine {
    dispatches: Vec<Dispatch>,
}

impl DispatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dispatches(dispatches: Vec<Dispatch>) -> Self {
        Self { dispatches }
    }

    pub fn next_number(&self) -> String {
        next_number(self.dispatches.iter().map(|d| d.number.as_str()))
    }

    pub fn find_by_number(&self, number: &str) -> DomainResult<&Dispatch> {
        self.dispatches
            .iter()
            .find(|d| d.number == number)
            .ok_or_else(|| DomainError::not_found("dispatch", number))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dispatch> {
        self.dispatches.iter()
    }

    pub fn as_slice(&self) -> &[Dispatch] {
        &self.dispatches
    }

    pub fn len(&self) -> usize {
        self.dispatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty()
    }

    /// Ordered quantity per product on an invoice.
    pub fn ordered(invoice: &Invoice) -> DomainResult<BTreeMap<String, i64>> {
        invoice.ordered_quantities()
    }

    /// Quantity per product already shipped against `invoice_number`.
    pub fn already_dispatched(&self, invoice_number: &str) -> DomainResult<BTreeMap<String, i64>> {
        tally(
            self.dispatches
                .iter()
                .filter(|d| d.invoice_number == invoice_number)
                .flat_map(|d| d.items.iter()),
        )
    }

    /// Ordered vs. dispatched per product for an invoice, sorted by code.
    pub fn fulfillment(&self, invoice: &Invoice) -> DomainResult<Vec<FulfillmentLine>> {
        let ordered = Self::ordered(invoice)?;
        let dispatched = self.already_dispatched(&invoice.number)?;

        let mut codes: Vec<&String> = ordered.keys().chain(dispatched.keys()).collect();
        codes.sort();
        codes.dedup();

        Ok(codes
            .into_iter()
            .map(|code| FulfillmentLine {
                product_code: code.clone(),
                ordered: ordered.get(code).copied().unwrap_or(0),
                dispatched: dispatched.get(code).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Ship part or all of a sale invoice.
    ///
    /// Fails as a whole only when the invoice is missing (`NotFound`) or is not
    /// a sale (`InvalidState`). Otherwise every line is judged in order against
    /// the allowance left after earlier dispatches and earlier lines of this
    /// call; accepted lines are taken out of stock and recorded under a fresh
    /// number. A call with no accepted line records nothing and consumes no
    /// number.
    pub fn create_dispatch(
        &mut self,
        invoices: &InvoiceLedger,
        catalog: &mut ProductCatalog,
        cmd: CreateDispatch,
    ) -> DomainResult<DispatchOutcome> {
        let invoice = invoices.find_by_number(&cmd.invoice_number)?;
        if !invoice.is_sale() {
            return Err(DomainError::invalid_state(format!(
                "dispatch allowed only for sale invoices (invoice {} is a {} invoice)",
                invoice.number, invoice.kind
            )));
        }

        let ordered = Self::ordered(invoice)?;
        let mut dispatched = self.already_dispatched(&invoice.number)?;
        let mut taken: BTreeMap<String, i64> = BTreeMap::new();

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for (position, item) in cmd.items.into_iter().enumerate() {
            match check_line(&item, &ordered, &dispatched, &taken, catalog) {
                Ok(()) => {
                    *dispatched.entry(item.product_code.clone()).or_insert(0) += item.qty;
                    *taken.entry(item.product_code.clone()).or_insert(0) += item.qty;
                    accepted.push(item);
                }
                Err(error) => rejected.push(RejectedLine {
                    position,
                    item,
                    error,
                }),
            }
        }

        if accepted.is_empty() {
            return Ok(DispatchOutcome {
                dispatch: None,
                rejected,
            });
        }

        for (code, qty) in &taken {
            catalog.withdraw(code, *qty)?;
        }

        let dispatch = Dispatch {
            number: self.next_number(),
            invoice_number: invoice.number.clone(),
            date: cmd.date,
            items: accepted,
        };
        self.dispatches.push(dispatch.clone());

        Ok(DispatchOutcome {
            dispatch: Some(dispatch),
            rejected,
        })
    }
}

fn check_line(
    item: &LineItem,
    ordered: &BTreeMap<String, i64>,
    dispatched: &BTreeMap<String, i64>,
    taken: &BTreeMap<String, i64>,
    catalog: &ProductCatalog,
) -> DomainResult<()> {
    item.ensure_positive()?;

    let code = item.product_code.as_str();
    let remaining = ordered
        .get(code)
        .copied()
        .unwrap_or(0)
        .saturating_sub(dispatched.get(code).copied().unwrap_or(0));
    if item.qty > remaining {
        return Err(DomainError::exceeds_order(code, remaining.max(0)));
    }

    let product = catalog.require(code)?;
    let available = product.qty() - taken.get(code).copied().unwrap_or(0);
    if available < item.qty {
        return Err(DomainError::insufficient_stock(code, available, item.qty));
    }
    Ok(())
}
