//! Plain-text tables written to stdout.

use std::collections::BTreeMap;
use std::io::{self, Write};

use stockledger_dispatch::{Dispatch, FulfillmentLine, RejectedLine};
use stockledger_invoicing::Invoice;
use stockledger_parties::Customer;
use stockledger_products::Product;

pub fn products<'a>(
    out: &mut impl Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> io::Result<()> {
    writeln!(out, "{:<10}{:<20}{:<10}Description", "Code", "Name", "Qty")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for p in products {
        writeln!(
            out,
            "{:<10}{:<20}{:<10}{}",
            p.code(),
            p.name(),
            p.qty(),
            p.description()
        )?;
    }
    Ok(())
}

pub fn customers<'a>(
    out: &mut impl Write,
    customers: impl IntoIterator<Item = &'a Customer>,
) -> io::Result<()> {
    writeln!(out, "{:<10}{:<20}{:<13}Address", "Code", "Name", "Phone")?;
    writeln!(out, "{}", "-".repeat(60))?;
    for c in customers {
        writeln!(
            out,
            "{:<10}{:<20}{:<13}{}",
            c.code(),
            c.name(),
            c.phone(),
            c.address()
        )?;
    }
    Ok(())
}

pub fn invoice_list<'a>(
    out: &mut impl Write,
    invoices: impl IntoIterator<Item = &'a Invoice>,
) -> io::Result<()> {
    writeln!(out, "{:<8}{:<10}{:<12}{:<10}Lines", "Number", "Type", "Date", "Customer")?;
    writeln!(out, "{}", "-".repeat(46))?;
    for i in invoices {
        writeln!(
            out,
            "{:<8}{:<10}{:<12}{:<10}{}",
            i.number,
            i.kind.as_str(),
            i.date.to_string(),
            i.customer_code.as_deref().unwrap_or("-"),
            i.items.len()
        )?;
    }
    Ok(())
}

pub fn invoice(out: &mut impl Write, invoice: &Invoice) -> io::Result<()> {
    writeln!(out, "Invoice {} ({})", invoice.number, invoice.kind)?;
    writeln!(out, "Date:     {}", invoice.date)?;
    writeln!(
        out,
        "Customer: {}",
        invoice.customer_code.as_deref().unwrap_or("-")
    )?;
    item_lines(out, invoice.items.iter().map(|i| (i.product_code.as_str(), i.qty)))
}

pub fn dispatch(out: &mut impl Write, dispatch: &Dispatch) -> io::Result<()> {
    writeln!(
        out,
        "Dispatch {} for invoice {}",
        dispatch.number, dispatch.invoice_number
    )?;
    writeln!(out, "Date:     {}", dispatch.date)?;
    item_lines(out, dispatch.items.iter().map(|i| (i.product_code.as_str(), i.qty)))
}

pub fn rejected(out: &mut impl Write, lines: &[RejectedLine]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "rejected line {} ({}): {}", line.position + 1, line.item, line.error)?;
    }
    Ok(())
}

pub fn fulfillment(
    out: &mut impl Write,
    invoice_number: &str,
    lines: &[FulfillmentLine],
) -> io::Result<()> {
    writeln!(out, "Invoice {invoice_number}")?;
    writeln!(out, "{:<10}{:<10}{:<12}Remaining", "Product", "Ordered", "Dispatched")?;
    writeln!(out, "{}", "-".repeat(41))?;
    for line in lines {
        writeln!(
            out,
            "{:<10}{:<10}{:<12}{}",
            line.product_code,
            line.ordered,
            line.dispatched,
            line.remaining()
        )?;
    }
    Ok(())
}

pub fn customer_consignment<'a>(
    out: &mut impl Write,
    balances: impl IntoIterator<Item = (&'a str, i64)>,
) -> io::Result<()> {
    writeln!(out, "{:<10}Qty", "Product")?;
    writeln!(out, "{}", "-".repeat(21))?;
    for (code, qty) in balances {
        writeln!(out, "{code:<10}{qty}")?;
    }
    Ok(())
}

pub fn consignment_totals(out: &mut impl Write, totals: &BTreeMap<String, i64>) -> io::Result<()> {
    writeln!(out, "{:<10}Total Consignment", "Product")?;
    writeln!(out, "{}", "-".repeat(33))?;
    for (code, qty) in totals {
        writeln!(out, "{code:<10}{qty}")?;
    }
    Ok(())
}

fn item_lines<'a>(
    out: &mut impl Write,
    items: impl Iterator<Item = (&'a str, i64)>,
) -> io::Result<()> {
    writeln!(out, "{:<10}Qty", "Product")?;
    for (code, qty) in items {
        writeln!(out, "{code:<10}{qty}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use stockledger_core::LineItem;
    use stockledger_invoicing::InvoiceKind;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn product_table_pads_columns() {
        let items = vec![Product::new("P1", "Bolt", "steel", 40).unwrap()];
        let text = render(|out| products(out, &items));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Code      Name                Qty       Description");
        assert_eq!(lines[2], "P1        Bolt                40        steel");
    }

    #[test]
    fn fulfillment_shows_remaining() {
        let lines = vec![FulfillmentLine {
            product_code: "P1".into(),
            ordered: 7,
            dispatched: 5,
        }];
        let text = render(|out| fulfillment(out, "1", &lines));
        assert!(text.starts_with("Invoice 1\n"));
        assert!(text.ends_with("P1        7         5           2\n"));
    }

    #[test]
    fn invoice_without_customer_shows_dash() {
        let inv = Invoice {
            number: "4".into(),
            kind: InvoiceKind::Purchase,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            customer_code: None,
            items: vec![LineItem::new("P9", 2)],
        };
        let text = render(|out| invoice(out, &inv));
        assert!(text.contains("Invoice 4 (purchase)"));
        assert!(text.contains("Customer: -"));
        assert!(text.contains("P9        2"));
    }

    #[test]
    fn totals_are_sorted_by_product() {
        let totals = BTreeMap::from([("P2".to_string(), 3), ("P1".to_string(), 5)]);
        let text = render(|out| consignment_totals(out, &totals));
        let rows: Vec<&str> = text.lines().skip(2).collect();
        assert_eq!(rows, vec!["P1        5", "P2        3"]);
    }
}
