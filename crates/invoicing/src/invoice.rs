use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, LineItem, tally};

/// Invoice type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    /// Stock received from a supplier; increases on-hand quantity.
    Purchase,
    /// Customer order; stock moves only when dispatched.
    Sale,
}

impl InvoiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceKind::Purchase => "purchase",
            InvoiceKind::Sale => "sale",
        }
    }
}

impl core::fmt::Display for InvoiceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the exact lowercase names are accepted.
impl FromStr for InvoiceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "purchase" => Ok(InvoiceKind::Purchase),
            "sale" => Ok(InvoiceKind::Sale),
            other => Err(DomainError::validation(format!(
                "invoice type must be 'purchase' or 'sale' (got '{other}')"
            ))),
        }
    }
}

/// A recorded invoice. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub number: String,
    pub kind: InvoiceKind,
    pub date: NaiveDate,
    /// Free-form; existence is not checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_code: Option<String>,
    pub items: Vec<LineItem>,
}

impl Invoice {
    pub fn is_sale(&self) -> bool {
        self.kind == InvoiceKind::Sale
    }

    /// Total ordered quantity per product code (repeated lines combine).
    pub fn ordered_quantities(&self) -> DomainResult<BTreeMap<String, i64>> {
        tally(&self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing_is_exact() {
        assert_eq!("purchase".parse::<InvoiceKind>().unwrap(), InvoiceKind::Purchase);
        assert_eq!("sale".parse::<InvoiceKind>().unwrap(), InvoiceKind::Sale);
        for bad in ["Sale", "sales", " sale", "return", ""] {
            assert!(matches!(bad.parse::<InvoiceKind>(), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn ordered_quantities_combine_lines() {
        let invoice = Invoice {
            number: "1".into(),
            kind: InvoiceKind::Sale,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            customer_code: None,
            items: vec![
                LineItem::new("P1", 3),
                LineItem::new("P2", 1),
                LineItem::new("P1", 4),
            ],
        };
        let ordered = invoice.ordered_quantities().unwrap();
        assert_eq!(ordered["P1"], 7);
        assert_eq!(ordered["P2"], 1);
    }
}
