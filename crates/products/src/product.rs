use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity};

/// Description given to products created implicitly by a purchase invoice.
pub const AUTO_CREATED_DESCRIPTION: &str = "Auto-created";

/// A stocked product.
///
/// `code` is fixed at creation. `qty` is the on-hand quantity and is never
/// negative; it only moves through [`Product::receive`] and
/// [`Product::withdraw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    code: String,
    name: String,
    description: String,
    qty: i64,
}

/// Stored shape; goes through [`Product::new`] on load.
#[derive(Deserialize)]
struct ProductRecord {
    code: String,
    name: String,
    description: String,
    qty: i64,
}

impl TryFrom<ProductRecord> for Product {
    type Error = DomainError;

    fn try_from(r: ProductRecord) -> DomainResult<Self> {
        Product::new(r.code, r.name, r.description, r.qty)
    }
}

impl Product {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        qty: i64,
    ) -> DomainResult<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("product code cannot be empty"));
        }
        if qty < 0 {
            return Err(DomainError::validation(format!(
                "initial quantity for {code} cannot be negative (got {qty})"
            )));
        }
        Ok(Self {
            code,
            name: name.into(),
            description: description.into(),
            qty,
        })
    }

    /// Product created on first sight of an unknown code on a purchase invoice.
    pub fn auto_created(code: impl Into<String>, qty: i64) -> DomainResult<Self> {
        let code = code.into();
        Self::new(code.clone(), code, AUTO_CREATED_DESCRIPTION, qty)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn qty(&self) -> i64 {
        self.qty
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Invariant: on-hand quantity covers `qty`.
    pub fn can_supply(&self, qty: i64) -> bool {
        self.qty >= qty
    }

    /// Add stock. Returns the new on-hand quantity.
    pub fn receive(&mut self, qty: i64) -> DomainResult<i64> {
        if qty <= 0 {
            return Err(DomainError::validation(format!(
                "received quantity for {} must be positive (got {qty})",
                self.code
            )));
        }
        self.qty = self
            .qty
            .checked_add(qty)
            .ok_or_else(|| DomainError::validation(format!("stock overflow for {}", self.code)))?;
        Ok(self.qty)
    }

    /// Remove stock. Fails without touching state if it would go negative.
    pub fn withdraw(&mut self, qty: i64) -> DomainResult<i64> {
        if qty <= 0 {
            return Err(DomainError::validation(format!(
                "withdrawn quantity for {} must be positive (got {qty})",
                self.code
            )));
        }
        if !self.can_supply(qty) {
            return Err(DomainError::insufficient_stock(&self.code, self.qty, qty));
        }
        self.qty -= qty;
        Ok(self.qty)
    }
}

impl Entity for Product {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}
