//! Command-line front end for the stock ledger.

pub mod args;
pub mod commands;
pub mod report;

pub use args::Cli;
pub use commands::{execute, exit_code};
