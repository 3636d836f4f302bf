//! Warehouse session: owns the in-memory collections and their stores.
//!
//! Every mutating operation runs the domain rule first and, only if it
//! succeeds, rewrites the collections it touched. A rejected operation never
//! reaches the stores.

use std::path::Path;

use thiserror::Error;

use stockledger_consignment::{ConsignmentEntry, ConsignmentLedger, TransferConsignment};
use stockledger_core::{DomainError, LineItem};
use stockledger_dispatch::{CreateDispatch, Dispatch, DispatchEngine, DispatchOutcome};
use stockledger_invoicing::{Invoice, InvoiceLedger, RecordPurchase, RecordSale};
use stockledger_parties::{Customer, CustomerChanges, CustomerRegistry};
use stockledger_products::{Product, ProductCatalog};

use chrono::NaiveDate;

use crate::legacy::LegacySnapshot;
use crate::store::{CollectionStore, JsonLinesStore, StoreError};

pub const PRODUCTS_FILE: &str = "products.jsonl";
pub const CUSTOMERS_FILE: &str = "customers.jsonl";
pub const INVOICES_FILE: &str = "invoices.jsonl";
pub const DISPATCHES_FILE: &str = "dispatches.jsonl";
pub const CONSIGNMENT_FILE: &str = "consignment.jsonl";

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// One store per collection.
pub struct WarehouseStores {
    pub products: Box<dyn CollectionStore<Product>>,
    pub customers: Box<dyn CollectionStore<Customer>>,
    pub invoices: Box<dyn CollectionStore<Invoice>>,
    pub dispatches: Box<dyn CollectionStore<Dispatch>>,
    pub consignment: Box<dyn CollectionStore<ConsignmentEntry>>,
}

impl WarehouseStores {
    /// JSON Lines files under `dir`.
    pub fn json_lines(dir: &Path) -> Self {
        Self {
            products: Box::new(JsonLinesStore::new(dir.join(PRODUCTS_FILE))),
            customers: Box::new(JsonLinesStore::new(dir.join(CUSTOMERS_FILE))),
            invoices: Box::new(JsonLinesStore::new(dir.join(INVOICES_FILE))),
            dispatches: Box::new(JsonLinesStore::new(dir.join(DISPATCHES_FILE))),
            consignment: Box::new(JsonLinesStore::new(dir.join(CONSIGNMENT_FILE))),
        }
    }
}

/// The session object every operation goes through.
pub struct Warehouse {
    stores: WarehouseStores,
    products: ProductCatalog,
    customers: CustomerRegistry,
    invoices: InvoiceLedger,
    dispatches: DispatchEngine,
    consignment: ConsignmentLedger,
}

impl Warehouse {
    /// Load every collection from `stores`.
    pub fn open(stores: WarehouseStores) -> WarehouseResult<Self> {
        let products = ProductCatalog::from_products(stores.products.load()?)?;
        let customers = CustomerRegistry::from_customers(stores.customers.load()?)?;
        let invoices = InvoiceLedger::from_invoices(stores.invoices.load()?);
        let dispatches = DispatchEngine::from_dispatches(stores.dispatches.load()?);
        let consignment = ConsignmentLedger::from_entries(stores.consignment.load()?)?;

        tracing::debug!(
            products = products.len(),
            customers = customers.len(),
            invoices = invoices.len(),
            dispatches = dispatches.len(),
            consignment = consignment.len(),
            "warehouse opened"
        );

        Ok(Self {
            stores,
            products,
            customers,
            invoices,
            dispatches,
            consignment,
        })
    }

    /// Open the JSON Lines collections under `dir`.
    pub fn open_dir(dir: &Path) -> WarehouseResult<Self> {
        Self::open(WarehouseStores::json_lines(dir))
    }

    pub fn products(&self) -> &ProductCatalog {
        &self.products
    }

    pub fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    pub fn invoices(&self) -> &InvoiceLedger {
        &self.invoices
    }

    pub fn dispatches(&self) -> &DispatchEngine {
        &self.dispatches
    }

    pub fn consignment(&self) -> &ConsignmentLedger {
        &self.consignment
    }

    fn save_products(&self) -> Result<(), StoreError> {
        self.stores.products.save(self.products.as_slice())
    }

    fn save_customers(&self) -> Result<(), StoreError> {
        self.stores.customers.save(self.customers.as_slice())
    }

    fn save_invoices(&self) -> Result<(), StoreError> {
        self.stores.invoices.save(self.invoices.as_slice())
    }

    fn save_dispatches(&self) -> Result<(), StoreError> {
        self.stores.dispatches.save(self.dispatches.as_slice())
    }

    fn save_consignment(&self) -> Result<(), StoreError> {
        self.stores.consignment.save(self.consignment.as_slice())
    }

    // --- catalog maintenance ---

    pub fn add_product(&mut self, product: Product) -> WarehouseResult<()> {
        let code = product.code().to_string();
        self.products.insert(product)?;
        self.save_products()?;
        tracing::info!(%code, "product added");
        Ok(())
    }

    pub fn update_product(
        &mut self,
        code: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> WarehouseResult<Product> {
        let product = self.products.update_details(code, name, description)?.clone();
        self.save_products()?;
        tracing::info!(%code, "product updated");
        Ok(product)
    }

    pub fn remove_product(&mut self, code: &str) -> WarehouseResult<Product> {
        let product = self.products.remove(code)?;
        self.save_products()?;
        tracing::info!(%code, "product deleted");
        Ok(product)
    }

    pub fn add_customer(&mut self, customer: Customer) -> WarehouseResult<()> {
        let code = customer.code().to_string();
        self.customers.insert(customer)?;
        self.save_customers()?;
        tracing::info!(%code, "customer added");
        Ok(())
    }

    pub fn update_customer(
        &mut self,
        code: &str,
        changes: CustomerChanges,
    ) -> WarehouseResult<Customer> {
        let customer = self.customers.update(code, changes)?.clone();
        self.save_customers()?;
        tracing::info!(%code, "customer updated");
        Ok(customer)
    }

    pub fn remove_customer(&mut self, code: &str) -> WarehouseResult<Customer> {
        let customer = self.customers.remove(code)?;
        self.save_customers()?;
        tracing::info!(%code, "customer deleted");
        Ok(customer)
    }

    // --- ledger operations ---

    /// Record an invoice whose type arrives as text (`purchase` / `sale`).
    pub fn create_invoice(
        &mut self,
        kind: &str,
        customer_code: Option<String>,
        items: Vec<LineItem>,
        date: NaiveDate,
    ) -> WarehouseResult<Invoice> {
        let invoice = self
            .invoices
            .create(&mut self.products, kind, customer_code, items, date)?
            .clone();
        self.persist_invoice(&invoice)?;
        Ok(invoice)
    }

    pub fn create_purchase(&mut self, cmd: RecordPurchase) -> WarehouseResult<Invoice> {
        let invoice = self.invoices.create_purchase(&mut self.products, cmd)?.clone();
        self.persist_invoice(&invoice)?;
        Ok(invoice)
    }

    pub fn create_sale(&mut self, cmd: RecordSale) -> WarehouseResult<Invoice> {
        let invoice = self.invoices.create_sale(cmd)?.clone();
        self.persist_invoice(&invoice)?;
        Ok(invoice)
    }

    fn persist_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        if !invoice.is_sale() {
            self.save_products()?;
        }
        self.save_invoices()?;
        tracing::info!(
            number = %invoice.number,
            kind = %invoice.kind,
            lines = invoice.items.len(),
            "invoice recorded"
        );
        Ok(())
    }

    /// Dispatch against a sale invoice. Rejected lines are reported in the
    /// outcome; stores are only written when a dispatch was recorded.
    pub fn create_dispatch(&mut self, cmd: CreateDispatch) -> WarehouseResult<DispatchOutcome> {
        let invoice_number = cmd.invoice_number.clone();
        let outcome = self
            .dispatches
            .create_dispatch(&self.invoices, &mut self.products, cmd)?;

        for rejected in &outcome.rejected {
            tracing::warn!(
                invoice = %invoice_number,
                product = %rejected.item.product_code,
                qty = rejected.item.qty,
                error = %rejected.error,
                "dispatch line rejected"
            );
        }

        match &outcome.dispatch {
            Some(dispatch) => {
                self.save_dispatches()?;
                self.save_products()?;
                tracing::info!(
                    number = %dispatch.number,
                    invoice = %dispatch.invoice_number,
                    lines = dispatch.items.len(),
                    "dispatch recorded"
                );
            }
            None => tracing::info!(invoice = %invoice_number, "nothing dispatched"),
        }
        Ok(outcome)
    }

    pub fn transfer_consignment(
        &mut self,
        cmd: TransferConsignment,
    ) -> WarehouseResult<ConsignmentEntry> {
        let entry = self
            .consignment
            .transfer(&self.customers, &mut self.products, cmd)?
            .clone();
        self.save_products()?;
        self.save_consignment()?;
        tracing::info!(
            customer = %entry.customer_code,
            product = %entry.product_code,
            balance = entry.qty,
            "consignment transferred"
        );
        Ok(entry)
    }

    // --- bulk ---

    /// Replace every collection with `snapshot` and persist all of them.
    /// The snapshot is validated (unique codes, positive balances) before
    /// anything is replaced.
    pub fn import(&mut self, snapshot: LegacySnapshot) -> WarehouseResult<()> {
        let products = ProductCatalog::from_products(snapshot.products)?;
        let customers = CustomerRegistry::from_customers(snapshot.customers)?;
        let consignment = ConsignmentLedger::from_entries(snapshot.consignment)?;

        self.products = products;
        self.customers = customers;
        self.invoices = InvoiceLedger::from_invoices(snapshot.invoices);
        self.dispatches = DispatchEngine::from_dispatches(snapshot.dispatches);
        self.consignment = consignment;
        self.save_all()?;

        tracing::info!(
            products = self.products.len(),
            customers = self.customers.len(),
            invoices = self.invoices.len(),
            dispatches = self.dispatches.len(),
            consignment = self.consignment.len(),
            "imported snapshot"
        );
        Ok(())
    }

    /// Copy of every collection, e.g. for legacy export.
    pub fn snapshot(&self) -> LegacySnapshot {
        LegacySnapshot {
            products: self.products.as_slice().to_vec(),
            customers: self.customers.as_slice().to_vec(),
            invoices: self.invoices.as_slice().to_vec(),
            dispatches: self.dispatches.as_slice().to_vec(),
            consignment: self.consignment.as_slice().to_vec(),
        }
    }

    pub fn save_all(&self) -> Result<(), StoreError> {
        self.save_products()?;
        self.save_customers()?;
        self.save_invoices()?;
        self.save_dispatches()?;
        self.save_consignment()
    }
}
