use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use stockledger_cli::{Cli, execute, exit_code};
use stockledger_infra::{AppConfig, Warehouse};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    stockledger_observability::init(config.log_format);
    tracing::debug!(data_dir = %config.data_dir.display(), "starting");

    let mut warehouse = Warehouse::open_dir(&config.data_dir)
        .with_context(|| format!("opening data directory {}", config.data_dir.display()))?;

    let mut out = std::io::stdout().lock();
    execute(&mut warehouse, cli.command, &mut out)
}
