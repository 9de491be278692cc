//! QuickBooks Online report tool.
//!
//! Connects to a QuickBooks Online ODBC data source and prints the list of
//! queryable tables followed by the full customer table.
//!
//! # Security Guarantees
//! - Catalog requests and `SELECT` statements only
//! - Connection-string secrets never reach logs or report files

use clap::Parser;
use qbreport::{Cli, Command, connection_config, output, run_reports, run_test};
use qbreport_core::{Result, create_source, init_logging, list_installed_sources};
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let mut stdout = std::io::stdout().lock();
    match cli.command() {
        Command::Sources => {
            let inventory = list_installed_sources()?;
            info!(
                "Found {} drivers and {} data sources",
                inventory.drivers.len(),
                inventory.data_sources.len()
            );
            let settings = cli.output_settings();
            let rendered = output::render_inventory(&inventory, settings.format)?;
            output::emit(&rendered, settings.path.as_deref(), &mut stdout)
        }
        command => {
            let config = connection_config(&cli.connection, || {
                rpassword::prompt_password("ODBC password: ")
            })?;
            info!("Target: {}", config.safe_description());

            let mut source = create_source(&config).map_err(|e| {
                error!("Failed to open data source: {}", e);
                e
            })?;

            let result = if command == Command::Test {
                run_test(source.as_mut(), &mut stdout)
            } else {
                run_reports(source.as_mut(), &cli, &mut stdout).map(|_| ())
            };
            source.close();

            result.map_err(|e| {
                error!("{}", e);
                e
            })
        }
    }
}
