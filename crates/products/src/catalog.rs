//! Product catalog: keyed store with in-place stock mutation.

use stockledger_core::{DomainError, DomainResult, Registry};

use crate::product::Product;

/// All products known to the warehouse, keyed by code (unique) and kept in
/// insertion order for listings.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Registry<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded records, rejecting duplicate codes.
    pub fn from_products(products: Vec<Product>) -> DomainResult<Self> {
        Ok(Self {
            products: Registry::from_vec(products)?,
        })
    }

    pub fn get(&self, code: &str) -> Option<&Product> {
        self.products.get(code)
    }

    /// Lookup that reports a missing code as `NotFound`.
    pub fn require(&self, code: &str) -> DomainResult<&Product> {
        self.get(code).ok_or_else(|| DomainError::not_found("product", code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.products.contains(code)
    }

    /// On-hand quantity for `code`, if the product exists.
    pub fn available(&self, code: &str) -> Option<i64> {
        self.get(code).map(Product::qty)
    }

    pub fn insert(&mut self, product: Product) -> DomainResult<()> {
        self.products.insert(product)
    }

    /// Change name and/or description. The code and quantity are not editable
    /// here: quantity only moves through ledger documents.
    pub fn update_details(
        &mut self,
        code: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> DomainResult<&Product> {
        let product = self
            .products
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found("product", code))?;
        if let Some(name) = name {
            product.set_name(name);
        }
        if let Some(description) = description {
            product.set_description(description);
        }
        Ok(product)
    }

    pub fn remove(&mut self, code: &str) -> DomainResult<Product> {
        self.products
            .remove(code)
            .ok_or_else(|| DomainError::not_found("product", code))
    }

    /// Increase stock of an existing product.
    pub fn receive(&mut self, code: &str, qty: i64) -> DomainResult<i64> {
        self.products
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found("product", code))?
            .receive(qty)
    }

    /// Decrease stock of an existing product; never drives it negative.
    pub fn withdraw(&mut self, code: &str, qty: i64) -> DomainResult<i64> {
        self.products
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found("product", code))?
            .withdraw(qty)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        self.products.as_slice()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
