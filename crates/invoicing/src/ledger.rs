//! Invoice ledger: numbering, purchase stock intake, sale order recording.

use chrono::NaiveDate;

use stockledger_core::{DomainError, DomainResult, LineItem, next_number, tally};
use stockledger_products::{Product, ProductCatalog};

use crate::invoice::{Invoice, InvoiceKind};

/// Command: RecordPurchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPurchase {
    /// Supplier code, if any. Not checked against the customer registry.
    pub customer_code: Option<String>,
    pub items: Vec<LineItem>,
    pub date: NaiveDate,
}

/// Command: RecordSale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSale {
    pub customer_code: Option<String>,
    pub items: Vec<LineItem>,
    pub date: NaiveDate,
}

/// All invoices in creation order.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLedger {
    invoices: Vec<Invoice>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_invoices(invoices: Vec<Invoice>) -> Self {
        Self { invoices }
    }

    /// Number the next invoice will receive.
    pub fn next_number(&self) -> String {
        next_number(self.invoices.iter().map(|i| i.number.as_str()))
    }

    pub fn find_by_number(&self, number: &str) -> DomainResult<&Invoice> {
        self.invoices
            .iter()
            .find(|i| i.number == number)
            .ok_or_else(|| DomainError::not_found("invoice", number))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.iter()
    }

    pub fn as_slice(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Record an invoice whose type arrives as text. The type is validated
    /// before anything else happens, so a rejected type consumes no number.
    pub fn create(
        &mut self,
        catalog: &mut ProductCatalog,
        kind: &str,
        customer_code: Option<String>,
        items: Vec<LineItem>,
        date: NaiveDate,
    ) -> DomainResult<&Invoice> {
        match kind.parse::<InvoiceKind>()? {
            InvoiceKind::Purchase => self.create_purchase(
                catalog,
                RecordPurchase {
                    customer_code,
                    items,
                    date,
                },
            ),
            InvoiceKind::Sale => self.create_sale(RecordSale {
                customer_code,
                items,
                date,
            }),
        }
    }

    /// Record a purchase and bring its quantities into stock. Unknown product
    /// codes are created on the fly.
    ///
    /// All lines are checked, and new products built, before the catalog is
    /// touched, so a rejected purchase leaves stock unchanged.
    pub fn create_purchase(
        &mut self,
        catalog: &mut ProductCatalog,
        cmd: RecordPurchase,
    ) -> DomainResult<&Invoice> {
        for item in &cmd.items {
            item.ensure_positive()?;
        }
        let totals = tally(&cmd.items)?;

        let mut created: Vec<Product> = Vec::new();
        for item in &cmd.items {
            let code = item.product_code.as_str();
            match catalog.available(code) {
                Some(on_hand) => {
                    if on_hand.checked_add(totals[code]).is_none() {
                        return Err(DomainError::validation(format!("stock overflow for {code}")));
                    }
                }
                None if created.iter().any(|p| p.code() == code) => {}
                None => created.push(Product::auto_created(code, totals[code])?),
            }
        }

        for item in &cmd.items {
            if catalog.contains(&item.product_code) {
                catalog.receive(&item.product_code, item.qty)?;
            }
        }
        for product in created {
            catalog.insert(product)?;
        }

        Ok(self.append(InvoiceKind::Purchase, cmd.customer_code, cmd.items, cmd.date))
    }

    /// Record a sale order. Stock is untouched until dispatch.
    pub fn create_sale(&mut self, cmd: RecordSale) -> DomainResult<&Invoice> {
        if cmd.items.is_empty() {
            return Err(DomainError::validation("cannot record a sale without items"));
        }
        for item in &cmd.items {
            item.ensure_positive()?;
        }
        tally(&cmd.items)?;
        Ok(self.append(InvoiceKind::Sale, cmd.customer_code, cmd.items, cmd.date))
    }

    fn append(
        &mut self,
        kind: InvoiceKind,
        customer_code: Option<String>,
        items: Vec<LineItem>,
        date: NaiveDate,
    ) -> &Invoice {
        let invoice = Invoice {
            number: self.next_number(),
            kind,
            date,
            customer_code: customer_code.filter(|c| !c.trim().is_empty()),
            items,
        };
        self.invoices.push(invoice);
        &self.invoices[self.invoices.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn purchase(items: Vec<LineItem>) -> RecordPurchase {
        RecordPurchase {
            customer_code: None,
            items,
            date: test_date(),
        }
    }

    fn sale(items: Vec<LineItem>) -> RecordSale {
        RecordSale {
            customer_code: Some("C1".into()),
            items,
            date: test_date(),
        }
    }

    #[test]
    fn purchase_increments_existing_and_auto_creates_unknown() {
        let mut catalog = ProductCatalog::new();
        catalog
            .insert(Product::new("P1", "Widget", "blue", 2).unwrap())
            .unwrap();
        let mut ledger = InvoiceLedger::new();

        let invoice = ledger
            .create_purchase(
                &mut catalog,
                purchase(vec![LineItem::new("P1", 3), LineItem::new("NEW", 4)]),
            )
            .unwrap();
        assert_eq!(invoice.number, "1");
        assert_eq!(invoice.kind, InvoiceKind::Purchase);

        assert_eq!(catalog.available("P1"), Some(5));
        let created = catalog.get("NEW").unwrap();
        assert_eq!(created.name(), "NEW");
        assert_eq!(created.description(), "Auto-created");
        assert_eq!(created.qty(), 4);
    }

    #[test]
    fn purchase_with_bad_line_leaves_stock_untouched() {
        let mut catalog = ProductCatalog::new();
        let mut ledger = InvoiceLedger::new();

        let err = ledger
            .create_purchase(
                &mut catalog,
                purchase(vec![LineItem::new("P1", 3), LineItem::new("P2", 0)]),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(catalog.is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn purchase_with_blank_code_receives_nothing() {
        let mut catalog = ProductCatalog::new();
        catalog
            .insert(Product::new("P1", "Widget", "blue", 1).unwrap())
            .unwrap();
        let mut ledger = InvoiceLedger::new();

        let err = ledger
            .create_purchase(
                &mut catalog,
                purchase(vec![LineItem::new("P1", 3), LineItem::new("", 2)]),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(catalog.available("P1"), Some(1));
        assert_eq!(catalog.len(), 1);
        assert!(ledger.is_empty());
    }

    #[test]
    fn repeated_unknown_code_is_created_once_with_the_total() {
        let mut catalog = ProductCatalog::new();
        let mut ledger = InvoiceLedger::new();

        ledger
            .create_purchase(
                &mut catalog,
                purchase(vec![
                    LineItem::new("N2", 1),
                    LineItem::new("N1", 2),
                    LineItem::new("N2", 5),
                ]),
            )
            .unwrap();
        let codes: Vec<&str> = catalog.iter().map(|p| p.code()).collect();
        assert_eq!(codes, vec!["N2", "N1"]);
        assert_eq!(catalog.available("N2"), Some(6));
    }

    #[test]
    fn purchase_total_overflow_is_rejected() {
        let mut catalog = ProductCatalog::new();
        let mut ledger = InvoiceLedger::new();

        let err = ledger
            .create_purchase(
                &mut catalog,
                purchase(vec![LineItem::new("P1", i64::MAX), LineItem::new("P1", 1)]),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn sale_whose_totals_overflow_is_rejected() {
        let mut ledger = InvoiceLedger::new();
        let err = ledger
            .create_sale(sale(vec![LineItem::new("P1", i64::MAX), LineItem::new("P1", 1)]))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(ledger.is_empty());
        assert_eq!(ledger.next_number(), "1");
    }

    #[test]
    fn sale_does_not_touch_stock() {
        let mut catalog = ProductCatalog::new();
        catalog
            .insert(Product::new("P1", "Widget", "", 10).unwrap())
            .unwrap();
        let mut ledger = InvoiceLedger::new();

        let invoice = ledger.create_sale(sale(vec![LineItem::new("P1", 7)])).unwrap();
        assert!(invoice.is_sale());
        assert_eq!(invoice.customer_code.as_deref(), Some("C1"));
        assert_eq!(catalog.available("P1"), Some(10));
    }

    #[test]
    fn sale_requires_positive_items() {
        let mut ledger = InvoiceLedger::new();
        assert!(matches!(
            ledger.create_sale(sale(vec![])),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            ledger.create_sale(sale(vec![LineItem::new("P1", -1)])),
            Err(DomainError::Validation(_))
        ));
        assert!(ledger.is_empty());
    }

    #[test]
    fn unknown_type_consumes_no_number() {
        let mut catalog = ProductCatalog::new();
        let mut ledger = InvoiceLedger::new();

        let err = ledger
            .create(&mut catalog, "refund", None, vec![LineItem::new("P1", 1)], test_date())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(ledger.next_number(), "1");

        let invoice = ledger
            .create(&mut catalog, "sale", None, vec![LineItem::new("P1", 1)], test_date())
            .unwrap();
        assert_eq!(invoice.number, "1");
    }

    #[test]
    fn numbering_skips_non_numeric_legacy_numbers() {
        let legacy = ["3", "5", "x"]
            .into_iter()
            .map(|n| Invoice {
                number: n.to_string(),
                kind: InvoiceKind::Sale,
                date: test_date(),
                customer_code: None,
                items: vec![LineItem::new("P1", 1)],
            })
            .collect();
        let mut ledger = InvoiceLedger::from_invoices(legacy);

        let invoice = ledger.create_sale(sale(vec![LineItem::new("P1", 1)])).unwrap();
        assert_eq!(invoice.number, "6");
    }

    #[test]
    fn find_by_number_reports_missing() {
        let ledger = InvoiceLedger::new();
        assert_eq!(
            ledger.find_by_number("9").unwrap_err(),
            DomainError::not_found("invoice", "9")
        );
    }

    #[test]
    fn blank_customer_code_is_dropped() {
        let mut ledger = InvoiceLedger::new();
        let invoice = ledger
            .create_sale(RecordSale {
                customer_code: Some("  ".into()),
                items: vec![LineItem::new("P1", 1)],
                date: test_date(),
            })
            .unwrap();
        assert_eq!(invoice.customer_code, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of purchases, each product's quantity is
        /// the sum of everything purchased for its code.
        #[test]
        fn stock_equals_sum_of_purchases(
            batches in prop::collection::vec(
                prop::collection::vec(("P[1-4]", 1i64..1_000), 0..5),
                1..10,
            )
        ) {
            let mut catalog = ProductCatalog::new();
            let mut ledger = InvoiceLedger::new();
            let mut expected = std::collections::BTreeMap::<String, i64>::new();

            for batch in batches {
                let items: Vec<LineItem> = batch
                    .iter()
                    .map(|(code, qty)| LineItem::new(code.clone(), *qty))
                    .collect();
                for item in &items {
                    *expected.entry(item.product_code.clone()).or_insert(0) += item.qty;
                }
                ledger.create_purchase(&mut catalog, purchase(items)).unwrap();
            }

            prop_assert_eq!(catalog.len(), expected.len());
            for (code, qty) in expected {
                prop_assert_eq!(catalog.available(&code), Some(qty));
            }
        }
    }
}
