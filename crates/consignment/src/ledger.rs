use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult};
use stockledger_parties::CustomerRegistry;
use stockledger_products::ProductCatalog;

/// Cumulative consignment balance for one (customer, product) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsignmentEntry {
    pub customer_code: String,
    pub product_code: String,
    pub qty: i64,
}

/// Command: TransferConsignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferConsignment {
    pub customer_code: String,
    pub product_code: String,
    pub qty: i64,
}

type EntryKey = (String, String);

/// Consignment balances, one entry per (customer, product), in first-transfer
/// order.
#[derive(Debug, Clone, Default)]
pub struct ConsignmentLedger {
    entries: Vec<ConsignmentEntry>,
    index: HashMap<EntryKey, usize>,
}

impl ConsignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded records. Rows sharing a key are merged into the
    /// first one. Balances must be positive.
    pub fn from_entries(entries: Vec<ConsignmentEntry>) -> DomainResult<Self> {
        let mut ledger = Self::new();
        for entry in entries {
            if entry.qty <= 0 {
                return Err(DomainError::validation(format!(
                    "consignment balance for {}/{} must be positive (got {})",
                    entry.customer_code, entry.product_code, entry.qty
                )));
            }
            ledger.credit(entry.customer_code, entry.product_code, entry.qty)?;
        }
        Ok(ledger)
    }

    /// Current balance for a pair, if any transfer happened.
    pub fn balance(&self, customer_code: &str, product_code: &str) -> Option<i64> {
        self.index
            .get(&(customer_code.to_string(), product_code.to_string()))
            .map(|&i| self.entries[i].qty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConsignmentEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[ConsignmentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `qty` of a product from warehouse stock to a customer's
    /// consignment balance. A failed transfer changes nothing.
    pub fn transfer(
        &mut self,
        customers: &CustomerRegistry,
        catalog: &mut ProductCatalog,
        cmd: TransferConsignment,
    ) -> DomainResult<&ConsignmentEntry> {
        if cmd.qty <= 0 {
            return Err(DomainError::validation(format!(
                "consignment quantity must be positive (got {})",
                cmd.qty
            )));
        }
        customers.require(&cmd.customer_code)?;
        let held = self.balance(&cmd.customer_code, &cmd.product_code).unwrap_or(0);
        if held.checked_add(cmd.qty).is_none() {
            return Err(overflow(&cmd.customer_code, &cmd.product_code));
        }
        catalog.withdraw(&cmd.product_code, cmd.qty)?;

        let pos = self.credit(cmd.customer_code, cmd.product_code, cmd.qty)?;
        Ok(&self.entries[pos])
    }

    /// `(product_code, qty)` held by one customer, in entry order. The
    /// iterator is lazy and can be cloned to restart.
    pub fn by_customer<'a>(
        &'a self,
        customer_code: &'a str,
    ) -> impl Iterator<Item = (&'a str, i64)> + Clone + 'a {
        self.entries
            .iter()
            .filter(move |e| e.customer_code == customer_code)
            .map(|e| (e.product_code.as_str(), e.qty))
    }

    /// Total consigned quantity per product across all customers.
    pub fn totals_by_product(&self) -> DomainResult<BTreeMap<String, i64>> {
        let mut totals = BTreeMap::new();
        for entry in &self.entries {
            let total = totals.entry(entry.product_code.clone()).or_insert(0i64);
            *total = total.checked_add(entry.qty).ok_or_else(|| {
                DomainError::validation(format!(
                    "consignment total overflow for {}",
                    entry.product_code
                ))
            })?;
        }
        Ok(totals)
    }

    fn credit(
        &mut self,
        customer_code: String,
        product_code: String,
        qty: i64,
    ) -> DomainResult<usize> {
        let key = (customer_code, product_code);
        if let Some(&pos) = self.index.get(&key) {
            let entry = &mut self.entries[pos];
            entry.qty = entry
                .qty
                .checked_add(qty)
                .ok_or_else(|| overflow(&entry.customer_code, &entry.product_code))?;
            return Ok(pos);
        }
        let pos = self.entries.len();
        self.entries.push(ConsignmentEntry {
            customer_code: key.0.clone(),
            product_code: key.1.clone(),
            qty,
        });
        self.index.insert(key, pos);
        Ok(pos)
    }
}

fn overflow(customer_code: &str, product_code: &str) -> DomainError {
    DomainError::validation(format!(
        "consignment balance overflow for {customer_code}/{product_code}"
    ))
}
