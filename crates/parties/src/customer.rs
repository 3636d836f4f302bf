use serde::{Deserialize, Serialize};

use stockledger_core::{DomainError, DomainResult, Entity, Registry};

/// A customer that can place sale orders and hold consignment stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    code: String,
    name: String,
    phone: String,
    address: String,
}

impl Customer {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> DomainResult<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("customer code cannot be empty"));
        }
        Ok(Self {
            code,
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Entity for Customer {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// Field changes for [`CustomerRegistry::update`]; `None` keeps the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Customer directory keyed by code.
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    customers: Registry<Customer>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_customers(customers: Vec<Customer>) -> DomainResult<Self> {
        Ok(Self {
            customers: Registry::from_vec(customers)?,
        })
    }

    pub fn get(&self, code: &str) -> Option<&Customer> {
        self.customers.get(code)
    }

    pub fn require(&self, code: &str) -> DomainResult<&Customer> {
        self.get(code).ok_or_else(|| DomainError::not_found("customer", code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.customers.contains(code)
    }

    pub fn insert(&mut self, customer: Customer) -> DomainResult<()> {
        self.customers.insert(customer)
    }

    pub fn update(&mut self, code: &str, changes: CustomerChanges) -> DomainResult<&Customer> {
        let customer = self
            .customers
            .get_mut(code)
            .ok_or_else(|| DomainError::not_found("customer", code))?;
        if let Some(name) = changes.name {
            customer.name = name;
        }
        if let Some(phone) = changes.phone {
            customer.phone = phone;
        }
        if let Some(address) = changes.address {
            customer.address = address;
        }
        Ok(customer)
    }

    pub fn remove(&mut self, code: &str) -> DomainResult<Customer> {
        self.customers
            .remove(code)
            .ok_or_else(|| DomainError::not_found("customer", code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    pub fn as_slice(&self) -> &[Customer] {
        self.customers.as_slice()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Customer {
        Customer::new("C1", "Acme", "555-0100", "1 Main St, Springfield").unwrap()
    }

    #[test]
    fn empty_code_is_rejected() {
        let err = Customer::new("", "Nobody", "", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn codes_are_unique() {
        let mut registry = CustomerRegistry::new();
        registry.insert(acme()).unwrap();
        let err = registry.insert(acme()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn update_only_touches_given_fields() {
        let mut registry = CustomerRegistry::from_customers(vec![acme()]).unwrap();
        let updated = registry
            .update(
                "C1",
                CustomerChanges {
                    phone: Some("555-0199".into()),
                    ..CustomerChanges::default()
                },
            )
            .unwrap();
        assert_eq!(updated.phone(), "555-0199");
        assert_eq!(updated.name(), "Acme");
        assert_eq!(updated.address(), "1 Main St, Springfield");
    }

    #[test]
    fn missing_customer_is_not_found() {
        let mut registry = CustomerRegistry::new();
        assert_eq!(
            registry.require("C9").unwrap_err(),
            DomainError::not_found("customer", "C9")
        );
        assert!(registry.remove("C9").is_err());
    }
}
