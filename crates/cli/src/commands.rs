//! Subcommand handlers.

use std::io::Write;

use anyhow::{Context, bail};

use stockledger_consignment::TransferConsignment;
use stockledger_core::DomainError;
use stockledger_dispatch::CreateDispatch;
use stockledger_infra::{Warehouse, WarehouseError, legacy};
use stockledger_invoicing::{RecordPurchase, RecordSale};
use stockledger_parties::{Customer, CustomerChanges};
use stockledger_products::Product;

use crate::args::{
    Command, ConsignmentCommand, CustomerCommand, DispatchCommand, InvoiceCommand, ProductCommand,
};
use crate::report;

/// Run one subcommand against an open warehouse, writing reports to `out`.
pub fn execute(
    warehouse: &mut Warehouse,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Product(cmd) => product(warehouse, cmd, out),
        Command::Customer(cmd) => customer(warehouse, cmd, out),
        Command::Invoice(cmd) => invoice(warehouse, cmd, out),
        Command::Dispatch(cmd) => dispatch(warehouse, cmd, out),
        Command::Consignment(cmd) => consignment(warehouse, cmd, out),
        Command::Inventory => Ok(report::products(out, warehouse.products().iter())?),
        Command::ImportLegacy { dir } => {
            let snapshot = legacy::read_dir(&dir)
                .with_context(|| format!("reading legacy files from {}", dir.display()))?;
            warehouse.import(snapshot)?;
            writeln!(
                out,
                "Imported {} products, {} customers, {} invoices, {} dispatches.",
                warehouse.products().len(),
                warehouse.customers().len(),
                warehouse.invoices().len(),
                warehouse.dispatches().len()
            )?;
            Ok(())
        }
        Command::ExportLegacy { dir } => {
            legacy::write_dir(&dir, &warehouse.snapshot())
                .with_context(|| format!("writing legacy files to {}", dir.display()))?;
            writeln!(out, "Exported to {}.", dir.display())?;
            Ok(())
        }
    }
}

fn product(wh: &mut Warehouse, cmd: ProductCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match cmd {
        ProductCommand::Add {
            code,
            name,
            description,
            qty,
        } => {
            wh.add_product(Product::new(code, name, description, qty)?)?;
            writeln!(out, "Product added.")?;
        }
        ProductCommand::Edit {
            code,
            name,
            description,
        } => {
            wh.update_product(&code, name, description)?;
            writeln!(out, "Saved.")?;
        }
        ProductCommand::Delete { code } => {
            wh.remove_product(&code)?;
            writeln!(out, "Deleted.")?;
        }
        ProductCommand::List => report::products(out, wh.products().iter())?,
    }
    Ok(())
}

fn customer(wh: &mut Warehouse, cmd: CustomerCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match cmd {
        CustomerCommand::Add {
            code,
            name,
            phone,
            address,
        } => {
            wh.add_customer(Customer::new(code, name, phone, address)?)?;
            writeln!(out, "Customer added.")?;
        }
        CustomerCommand::Edit {
            code,
            name,
            phone,
            address,
        } => {
            wh.update_customer(
                &code,
                CustomerChanges {
                    name,
                    phone,
                    address,
                },
            )?;
            writeln!(out, "Saved.")?;
        }
        CustomerCommand::Delete { code } => {
            wh.remove_customer(&code)?;
            writeln!(out, "Deleted.")?;
        }
        CustomerCommand::List => report::customers(out, wh.customers().iter())?,
    }
    Ok(())
}

fn invoice(wh: &mut Warehouse, cmd: InvoiceCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match cmd {
        InvoiceCommand::Purchase {
            customer,
            items,
            date,
        } => {
            let invoice = wh.create_purchase(RecordPurchase {
                customer_code: customer,
                items,
                date: date.or_today(),
            })?;
            writeln!(out, "Purchase invoice {} created.", invoice.number)?;
        }
        InvoiceCommand::Sale {
            customer,
            items,
            date,
        } => {
            let invoice = wh.create_sale(RecordSale {
                customer_code: customer,
                items,
                date: date.or_today(),
            })?;
            writeln!(out, "Sale invoice {} created.", invoice.number)?;
        }
        InvoiceCommand::Show { number } => {
            report::invoice(out, wh.invoices().find_by_number(&number)?)?;
        }
        InvoiceCommand::List => report::invoice_list(out, wh.invoices().iter())?,
    }
    Ok(())
}

fn dispatch(wh: &mut Warehouse, cmd: DispatchCommand, out: &mut impl Write) -> anyhow::Result<()> {
    match cmd {
        DispatchCommand::Create {
            invoice,
            items,
            date,
        } => {
            let outcome = wh.create_dispatch(CreateDispatch {
                invoice_number: invoice.clone(),
                items,
                date: date.or_today(),
            })?;
            report::rejected(out, &outcome.rejected)?;
            match outcome.dispatch {
                Some(dispatch) => writeln!(out, "Dispatch {} created.", dispatch.number)?,
                None => bail!(DomainError::invalid_state(format!(
                    "no lines dispatched against invoice {invoice}"
                ))),
            }
        }
        DispatchCommand::Show { number } => {
            report::dispatch(out, wh.dispatches().find_by_number(&number)?)?;
        }
        DispatchCommand::Status { invoice } => {
            let found = wh.invoices().find_by_number(&invoice)?;
            let lines = wh.dispatches().fulfillment(found)?;
            report::fulfillment(out, &invoice, &lines)?;
        }
    }
    Ok(())
}

fn consignment(
    wh: &mut Warehouse,
    cmd: ConsignmentCommand,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cmd {
        ConsignmentCommand::Transfer {
            customer,
            product,
            qty,
        } => {
            let entry = wh.transfer_consignment(TransferConsignment {
                customer_code: customer,
                product_code: product,
                qty,
            })?;
            writeln!(
                out,
                "Consignment added. {} now holds {} of {}.",
                entry.customer_code, entry.qty, entry.product_code
            )?;
        }
        ConsignmentCommand::Customer { code } => {
            report::customer_consignment(out, wh.consignment().by_customer(&code))?;
        }
        ConsignmentCommand::Totals => {
            report::consignment_totals(out, &wh.consignment().totals_by_product()?)?;
        }
    }
    Ok(())
}

/// Process exit status for a failed command: 1 for rejected operations,
/// 2 for storage and configuration failures.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<DomainError>() {
            return 1;
        }
        if let Some(WarehouseError::Domain(_)) = cause.downcast_ref::<WarehouseError>() {
            return 1;
        }
    }
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use clap::Parser;

    use crate::args::Cli;

    fn run(wh: &mut Warehouse, argv: &[&str]) -> anyhow::Result<String> {
        let mut args = vec!["stockledger"];
        args.extend_from_slice(argv);
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        execute(wh, cli.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn dispatch_flow_reports_rejections_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = Warehouse::open_dir(dir.path()).unwrap();

        run(&mut wh, &["product", "add", "P1", "Widget", "--qty", "10"]).unwrap();
        let created = run(&mut wh, &["invoice", "sale", "P1:7", "--date", "2024-06-01"]).unwrap();
        assert_eq!(created, "Sale invoice 1 created.\n");

        run(&mut wh, &["dispatch", "create", "1", "P1:5"]).unwrap();
        let err = run(&mut wh, &["dispatch", "create", "1", "P1:3"]).unwrap_err();
        assert_eq!(exit_code(&err), 1);

        let status = run(&mut wh, &["dispatch", "status", "1"]).unwrap();
        assert!(status.contains("P1        7         5           2"));
        assert_eq!(wh.products().available("P1"), Some(5));
    }

    #[test]
    fn domain_errors_exit_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = Warehouse::open_dir(dir.path()).unwrap();

        let err = run(&mut wh, &["invoice", "show", "9"]).unwrap_err();
        assert_eq!(exit_code(&err), 1);

        let err = run(&mut wh, &["consignment", "transfer", "C1", "P1", "1"]).unwrap_err();
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn overflowing_sale_is_rejected_before_it_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = Warehouse::open_dir(dir.path()).unwrap();

        let err = run(&mut wh, &["invoice", "sale", "P1:9223372036854775807", "P1:1"]).unwrap_err();
        assert_eq!(exit_code(&err), 1);
        assert!(wh.invoices().is_empty());
        assert!(run(&mut wh, &["dispatch", "status", "1"]).is_err());
    }

    #[test]
    fn missing_legacy_directory_imports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = Warehouse::open_dir(dir.path()).unwrap();
        let legacy_dir = dir.path().join("legacy");

        let text = run(&mut wh, &["import-legacy", legacy_dir.to_str().unwrap()]).unwrap();
        assert!(text.starts_with("Imported 0 products"));
    }

    #[test]
    fn export_writes_legacy_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut wh = Warehouse::open_dir(&dir.path().join("data")).unwrap();
        wh.create_purchase(RecordPurchase {
            customer_code: None,
            items: vec![stockledger_core::LineItem::new("P1", 3)],
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        })
        .unwrap();

        let out_dir = dir.path().join("export");
        run(&mut wh, &["export-legacy", out_dir.to_str().unwrap()]).unwrap();
        let text = std::fs::read_to_string(out_dir.join(legacy::PRODUCTS_FILE)).unwrap();
        assert_eq!(text, "P1,P1,Auto-created,3\n");
    }

    #[test]
    fn store_failures_exit_with_two() {
        let err = anyhow::Error::new(WarehouseError::Store(stockledger_infra::StoreError::io(
            "/nowhere",
            std::io::Error::other("disk gone"),
        )));
        assert_eq!(exit_code(&err), 2);
    }
}
