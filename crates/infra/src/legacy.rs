//! Reader/writer for the legacy delimited text files.
//!
//! Each record is one line of comma-separated fields. A field wrapped in
//! double quotes may contain commas. Invoice and dispatch lines carry their
//! items in a single field as `code:qty` pairs joined by `;`.
//!
//! The format cannot represent codes containing `,` `:` or `;`; it is kept
//! for importing old data and exporting for old tooling only.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::NaiveDate;

use stockledger_consignment::ConsignmentEntry;
use stockledger_core::LineItem;
use stockledger_dispatch::Dispatch;
use stockledger_invoicing::{Invoice, InvoiceKind};
use stockledger_parties::Customer;
use stockledger_products::Product;

use crate::store::StoreError;

pub const PRODUCTS_FILE: &str = "products.txt";
pub const CUSTOMERS_FILE: &str = "customers.txt";
pub const INVOICES_FILE: &str = "invoices.txt";
pub const DISPATCHES_FILE: &str = "dispatches.txt";
pub const CONSIGNMENT_FILE: &str = "consignment.txt";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Every collection read from (or written to) a legacy data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacySnapshot {
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub invoices: Vec<Invoice>,
    pub dispatches: Vec<Dispatch>,
    pub consignment: Vec<ConsignmentEntry>,
}

/// Split on commas outside double quotes, trimming fields and dropping the
/// quotes themselves.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut quoted = false;
    for c in line.chars() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                out.push(cur.trim().to_string());
                cur.clear();
            }
            _ => cur.push(c),
        }
    }
    out.push(cur.trim().to_string());
    out
}

fn quote_if_needed(field: &str) -> String {
    if field.contains(',') {
        format!("\"{field}\"")
    } else {
        field.to_string()
    }
}

/// Line-level parse failure; the caller attaches file and line number.
type ParseResult<T> = Result<T, String>;

fn expect_fields(fields: &[String], n: usize, what: &str) -> ParseResult<()> {
    if fields.len() < n {
        return Err(format!("{what} record needs {n} fields, found {}", fields.len()));
    }
    Ok(())
}

fn parse_qty(raw: &str) -> ParseResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid quantity '{raw}': {e}"))
}

fn parse_positive_qty(raw: &str) -> ParseResult<i64> {
    let qty = parse_qty(raw)?;
    if qty <= 0 {
        return Err(format!("quantity must be positive (got {qty})"));
    }
    Ok(qty)
}

fn parse_date(raw: &str) -> ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| format!("invalid date '{raw}': {e}"))
}

/// `code:qty;code:qty`. Empty segments are skipped; the quantity follows the
/// first `:` and must be positive.
pub fn parse_items(raw: &str) -> ParseResult<Vec<LineItem>> {
    raw.split(';')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            let (code, qty) = s
                .split_once(':')
                .ok_or_else(|| format!("item '{s}' is not code:qty"))?;
            let code = code.trim();
            if code.is_empty() {
                return Err(format!("item '{s}' has no product code"));
            }
            Ok(LineItem::new(code, parse_positive_qty(qty)?))
        })
        .collect()
}

pub fn format_items(items: &[LineItem]) -> String {
    items
        .iter()
        .map(|i| format!("{}:{}", i.product_code, i.qty))
        .collect::<Vec<_>>()
        .join(";")
}

pub fn parse_product(line: &str) -> ParseResult<Product> {
    let f = split_fields(line);
    expect_fields(&f, 4, "product")?;
    Product::new(&f[0], &f[1], &f[2], parse_qty(&f[3])?).map_err(|e| e.to_string())
}

pub fn format_product(p: &Product) -> String {
    format!(
        "{},{},{},{}",
        p.code(),
        p.name(),
        quote_if_needed(p.description()),
        p.qty()
    )
}

pub fn parse_customer(line: &str) -> ParseResult<Customer> {
    let f = split_fields(line);
    expect_fields(&f, 4, "customer")?;
    Customer::new(&f[0], &f[1], &f[2], &f[3]).map_err(|e| e.to_string())
}

pub fn format_customer(c: &Customer) -> String {
    format!(
        "{},{},{},{}",
        c.code(),
        c.name(),
        c.phone(),
        quote_if_needed(c.address())
    )
}

pub fn parse_invoice(line: &str) -> ParseResult<Invoice> {
    let f = split_fields(line);
    expect_fields(&f, 5, "invoice")?;
    let kind = f[1].parse::<InvoiceKind>().map_err(|e| e.to_string())?;
    Ok(Invoice {
        number: f[0].clone(),
        kind,
        date: parse_date(&f[2])?,
        customer_code: Some(f[3].clone()).filter(|c| !c.is_empty()),
        items: parse_items(&f[4])?,
    })
}

pub fn format_invoice(i: &Invoice) -> String {
    format!(
        "{},{},{},{},{}",
        i.number,
        i.kind,
        i.date.format(DATE_FORMAT),
        i.customer_code.as_deref().unwrap_or(""),
        format_items(&i.items)
    )
}

pub fn parse_dispatch(line: &str) -> ParseResult<Dispatch> {
    let f = split_fields(line);
    expect_fields(&f, 4, "dispatch")?;
    Ok(Dispatch {
        number: f[0].clone(),
        invoice_number: f[1].clone(),
        date: parse_date(&f[2])?,
        items: parse_items(&f[3])?,
    })
}

pub fn format_dispatch(d: &Dispatch) -> String {
    format!(
        "{},{},{},{}",
        d.number,
        d.invoice_number,
        d.date.format(DATE_FORMAT),
        format_items(&d.items)
    )
}

pub fn parse_consignment(line: &str) -> ParseResult<ConsignmentEntry> {
    let f = split_fields(line);
    expect_fields(&f, 3, "consignment")?;
    Ok(ConsignmentEntry {
        customer_code: f[0].clone(),
        product_code: f[1].clone(),
        qty: parse_positive_qty(&f[2])?,
    })
}

pub fn format_consignment(e: &ConsignmentEntry) -> String {
    format!("{},{},{}", e.customer_code, e.product_code, e.qty)
}

fn read_file<T>(
    dir: &Path,
    file: &str,
    parse: impl Fn(&str) -> ParseResult<T>,
) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StoreError::io(&path, e)),
    };

    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = parse(line).map_err(|message| StoreError::Legacy {
            file: file.to_string(),
            line: idx + 1,
            message,
        })?;
        out.push(record);
    }
    tracing::debug!(file, count = out.len(), "read legacy file");
    Ok(out)
}

fn write_file<T>(
    dir: &Path,
    file: &str,
    records: &[T],
    format: impl Fn(&T) -> String,
) -> Result<(), StoreError> {
    let path = dir.join(file);
    let mut out = String::new();
    for record in records {
        out.push_str(&format(record));
        out.push('\n');
    }
    fs::write(&path, out).map_err(|e| StoreError::io(&path, e))
}

/// Read every legacy file in `dir`. Missing files read as empty.
pub fn read_dir(dir: &Path) -> Result<LegacySnapshot, StoreError> {
    Ok(LegacySnapshot {
        products: read_file(dir, PRODUCTS_FILE, parse_product)?,
        customers: read_file(dir, CUSTOMERS_FILE, parse_customer)?,
        invoices: read_file(dir, INVOICES_FILE, parse_invoice)?,
        dispatches: read_file(dir, DISPATCHES_FILE, parse_dispatch)?,
        consignment: read_file(dir, CONSIGNMENT_FILE, parse_consignment)?,
    })
}

/// Write a snapshot as legacy files into `dir` (created if missing).
pub fn write_dir(dir: &Path, snapshot: &LegacySnapshot) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    write_file(dir, PRODUCTS_FILE, &snapshot.products, format_product)?;
    write_file(dir, CUSTOMERS_FILE, &snapshot.customers, format_customer)?;
    write_file(dir, INVOICES_FILE, &snapshot.invoices, format_invoice)?;
    write_file(dir, DISPATCHES_FILE, &snapshot.dispatches, format_dispatch)?;
    write_file(dir, CONSIGNMENT_FILE, &snapshot.consignment, format_consignment)?;
    Ok(())
}
