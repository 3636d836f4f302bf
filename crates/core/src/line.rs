//! Document lines shared by invoices and dispatches.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// One `(product_code, qty)` line within an invoice or dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineItem {
    pub product_code: String,
    pub qty: i64,
}

impl LineItem {
    pub fn new(product_code: impl Into<String>, qty: i64) -> Self {
        Self {
            product_code: product_code.into(),
            qty,
        }
    }

    /// Lines must move a strictly positive quantity.
    pub fn ensure_positive(&self) -> DomainResult<()> {
        if self.qty <= 0 {
            return Err(DomainError::validation(format!(
                "quantity for {} must be positive (got {})",
                self.product_code, self.qty
            )));
        }
        Ok(())
    }
}

impl core::fmt::Display for LineItem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.product_code, self.qty)
    }
}

/// Parses `CODE:QTY`. The quantity is taken after the last `:` so codes may
/// themselves contain colons.
impl FromStr for LineItem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, qty) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| DomainError::validation(format!("expected CODE:QTY, got '{s}'")))?;
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::validation(format!("missing product code in '{s}'")));
        }
        let qty = qty
            .trim()
            .parse::<i64>()
            .map_err(|e| DomainError::validation(format!("invalid quantity in '{s}': {e}")))?;
        Ok(Self::new(code, qty))
    }
}

/// Sums quantities per product code; repeated codes combine. A total that
/// does not fit in `i64` is a validation error.
pub fn tally<'a, I>(items: I) -> DomainResult<BTreeMap<String, i64>>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    let mut out = BTreeMap::new();
    for item in items {
        let total = out.entry(item.product_code.clone()).or_insert(0i64);
        *total = total.checked_add(item.qty).ok_or_else(|| {
            DomainError::validation(format!("quantity overflow for {}", item.product_code))
        })?;
    }
    Ok(out)
}
