//! Argument definitions (clap derive).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use stockledger_core::LineItem;
use stockledger_observability::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "stockledger", version, about = "Warehouse stock ledger")]
pub struct Cli {
    /// TOML config file (default: ./stockledger.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the collection files.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log output format: compact or json.
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the product catalog.
    #[command(subcommand)]
    Product(ProductCommand),

    /// Manage customers.
    #[command(subcommand)]
    Customer(CustomerCommand),

    /// Record and inspect invoices.
    #[command(subcommand)]
    Invoice(InvoiceCommand),

    /// Ship against sale invoices.
    #[command(subcommand)]
    Dispatch(DispatchCommand),

    /// Move stock into customer consignment.
    #[command(subcommand)]
    Consignment(ConsignmentCommand),

    /// Stock on hand for every product.
    Inventory,

    /// Replace all data with the delimited files in DIR.
    ImportLegacy { dir: PathBuf },

    /// Write all data as delimited files into DIR.
    ExportLegacy { dir: PathBuf },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    Add {
        code: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        qty: i64,
    },
    Edit {
        code: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        code: String,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum CustomerCommand {
    Add {
        code: String,
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    Edit {
        code: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    Delete {
        code: String,
    },
    List,
}

/// Document date; today when omitted.
#[derive(Debug, Clone, Args)]
pub struct DateArg {
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl DateArg {
    pub fn or_today(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[derive(Debug, Subcommand)]
pub enum InvoiceCommand {
    /// Receive stock. Unknown product codes are created.
    Purchase {
        #[arg(long)]
        customer: Option<String>,
        /// CODE:QTY
        items: Vec<LineItem>,
        #[command(flatten)]
        date: DateArg,
    },
    /// Record a customer order.
    Sale {
        #[arg(long)]
        customer: Option<String>,
        /// CODE:QTY
        #[arg(required = true)]
        items: Vec<LineItem>,
        #[command(flatten)]
        date: DateArg,
    },
    Show {
        number: String,
    },
    List,
}

#[derive(Debug, Subcommand)]
pub enum DispatchCommand {
    /// Ship lines of a sale invoice.
    Create {
        invoice: String,
        /// CODE:QTY
        #[arg(required = true)]
        items: Vec<LineItem>,
        #[command(flatten)]
        date: DateArg,
    },
    Show {
        number: String,
    },
    /// Ordered vs. dispatched for one invoice.
    Status {
        invoice: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConsignmentCommand {
    Transfer {
        customer: String,
        product: String,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Balances held by one customer.
    Customer {
        code: String,
    },
    /// Consigned quantity per product.
    Totals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stockledger",
            "inventory",
            "--data-dir",
            "/tmp/wh",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/wh")));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert!(matches!(cli.command, Command::Inventory));
    }

    #[test]
    fn parses_sale_items_and_date() {
        let cli = Cli::try_parse_from([
            "stockledger",
            "invoice",
            "sale",
            "--customer",
            "C1",
            "P1:7",
            "P2:1",
            "--date",
            "2024-06-01",
        ])
        .unwrap();
        match cli.command {
            Command::Invoice(InvoiceCommand::Sale { customer, items, date }) => {
                assert_eq!(customer.as_deref(), Some("C1"));
                assert_eq!(items, vec![LineItem::new("P1", 7), LineItem::new("P2", 1)]);
                assert_eq!(date.date, NaiveDate::from_ymd_opt(2024, 6, 1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_item() {
        let err = Cli::try_parse_from(["stockledger", "dispatch", "create", "1", "P1-5"]);
        assert!(err.is_err());
    }

    #[test]
    fn sale_requires_items() {
        assert!(Cli::try_parse_from(["stockledger", "invoice", "sale"]).is_err());
    }

    #[test]
    fn transfer_accepts_negative_quantity_for_domain_check() {
        let cli = Cli::try_parse_from([
            "stockledger",
            "consignment",
            "transfer",
            "C1",
            "P1",
            "-2",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Consignment(ConsignmentCommand::Transfer { qty: -2, .. })
        ));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["stockledger", "inventory", "--log-format", "xml"]).is_err());
    }
}
