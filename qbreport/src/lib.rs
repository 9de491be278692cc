//! Library module for the qbreport binary.
//!
//! Holds the CLI definition, configuration resolution and command execution
//! so they can be tested without a driver. `main.rs` only parses arguments,
//! sets up logging and opens the real data source.

pub mod output;

use clap::{Args, Parser, Subcommand};
use qbreport_core::{
    CatalogMode, CollectionConfig, ConnectionConfig, DataSource, QbReportError, ReportSet, Result,
    adapters::{DEFAULT_CONNECTION_STRING, DEFAULT_TABLE},
    collect_reports, collect_reports_with,
    security::ConnectionString,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use zeroize::Zeroizing;

pub use output::{OutputFormat, OutputSettings};

/// Environment variable holding the driver connection string
pub const CONNECTION_STRING_ENV: &str = "QBREPORT_CONNECTION_STRING";

/// CLI argument structure
#[derive(Debug, Parser)]
#[command(name = "qbreport")]
#[command(about = "QuickBooks Online table and customer reports over ODBC")]
#[command(version)]
#[command(long_about = "
qbreport - QuickBooks Online reports over ODBC

Connects to a QuickBooks Online data source through its ODBC driver and prints:
- The list of queryable tables (Name, Description)
- Every row of the Customer table, under the driver's column names

The driver performs authentication and query execution; configure it in your
ODBC data source administrator, then point qbreport at the DSN.

SECURITY FEATURES:
- Catalog queries and SELECT statements only
- Passwords and OAuth tokens are redacted in logs and report files

EXAMPLES:
  qbreport
  qbreport tables
  qbreport customers --table Invoice --format json --output invoices.json
  qbreport --connection-string 'DSN=QuickBooks Online Data 64-Bit;' --prompt-password test
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Table whose rows are reported
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_TABLE,
        help = "Table whose columns and rows are fetched"
    )]
    pub table: String,
}

/// Available CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print the table list and the table rows (default)
    Report,
    /// Print the table list only
    Tables,
    /// Print the rows of --table (Customer by default) only
    Customers,
    /// Test the data source connection
    Test,
    /// List installed ODBC drivers and data sources
    Sources,
}

/// Connection options
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// ODBC connection string
    #[arg(
        long,
        global = true,
        env = CONNECTION_STRING_ENV,
        default_value = DEFAULT_CONNECTION_STRING,
        hide_env_values = true,
        help = "ODBC connection string (secrets are redacted in logs)"
    )]
    pub connection_string: String,

    /// File containing the connection string
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "Read the connection string from a file instead"
    )]
    pub connection_string_file: Option<PathBuf>,

    /// Prompt for a password
    #[arg(
        long,
        global = true,
        help = "Prompt for a password and pass it to the driver as PWD"
    )]
    pub prompt_password: bool,

    /// Catalog query style
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "statement",
        help = "Issue catalog queries as driver commands (statement) or ODBC catalog calls (odbc)"
    )]
    pub catalog: CatalogArg,

    /// Login timeout in seconds
    #[arg(
        long,
        global = true,
        value_name = "SECONDS",
        help = "Login timeout in seconds"
    )]
    pub login_timeout: Option<u64>,
}

/// CLI spelling of [`CatalogMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CatalogArg {
    /// SP_TABLES / SP_COLUMNS command text
    Statement,
    /// SQLTables / SQLColumns
    Odbc,
}

impl From<CatalogArg> for CatalogMode {
    fn from(arg: CatalogArg) -> Self {
        match arg {
            CatalogArg::Statement => Self::Statement,
            CatalogArg::Odbc => Self::Odbc,
        }
    }
}

/// Output options
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub format: OutputFormat,

    /// Output file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Write to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    /// Text display row limit
    #[arg(
        long,
        global = true,
        default_value = "60",
        help = "Show only the first and last rows of longer tables (0 = show all)"
    )]
    pub max_rows: usize,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Command to run, defaulting to the full report.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Report)
    }

    /// Collection settings implied by the command and `--table`.
    pub fn collection_config(&self) -> CollectionConfig {
        match self.command() {
            Command::Tables => CollectionConfig::table_list_only(),
            Command::Customers => CollectionConfig::table_rows_only(self.table.clone()),
            _ => CollectionConfig::default().with_table(self.table.clone()),
        }
    }

    /// Output settings from the output options.
    pub fn output_settings(&self) -> OutputSettings {
        OutputSettings {
            format: self.output.format,
            path: self.output.output.clone(),
            max_rows: self.output.max_rows,
        }
    }
}

/// Loads the connection string from the configured source.
///
/// `--connection-string-file` wins over `--connection-string`, which clap
/// already fills from the environment or the default DSN.
///
/// # Errors
/// Returns error if the file cannot be read or is empty.
///
/// # Security
/// Never logs the connection string itself, only its redacted form.
pub fn resolve_connection_string(args: &ConnectionArgs) -> Result<ConnectionString> {
    let connection_string = match &args.connection_string_file {
        Some(path) => {
            let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
                QbReportError::io(
                    format!("Failed to read connection string file {}", path.display()),
                    e,
                )
            })?);
            let connection_string = ConnectionString::new(contents.trim());
            if connection_string.is_blank() {
                return Err(QbReportError::configuration(format!(
                    "Connection string file {} is empty",
                    path.display()
                )));
            }
            info!("Connection string loaded from {}", path.display());
            connection_string
        }
        None => ConnectionString::new(args.connection_string.as_str()),
    };

    Ok(connection_string)
}

/// Builds the connection configuration.
///
/// `read_password` is called only when `--prompt-password` is set.
///
/// # Errors
/// Returns error if the connection string cannot be loaded, the password
/// cannot be read, or the resulting configuration is invalid.
pub fn connection_config<F>(args: &ConnectionArgs, read_password: F) -> Result<ConnectionConfig>
where
    F: FnOnce() -> std::io::Result<String>,
{
    let mut connection_string = resolve_connection_string(args)?;

    if args.prompt_password {
        let password = Zeroizing::new(
            read_password()
                .map_err(|e| QbReportError::io("Failed to read password", e))?,
        );
        if password.is_empty() {
            return Err(QbReportError::configuration("Password cannot be empty"));
        }
        if connection_string.has_password() {
            warn!("Prompted password replaces the one in the connection string");
        }
        connection_string = connection_string.with_password(&password)?;
    }

    let mut config = ConnectionConfig::new(connection_string.expose())
        .with_catalog_mode(args.catalog.into());
    if let Some(secs) = args.login_timeout {
        config = config.with_login_timeout(Duration::from_secs(secs));
    }

    config.validate()?;
    Ok(config)
}

/// Runs the reports selected on the command line and writes them out.
///
/// Output goes to the `--output` file when set, otherwise to `stdout`. Text
/// output is written frame by frame, so the table list is already out when a
/// later query fails. JSON output is written once, after every report.
///
/// # Errors
/// Returns the first error from the reports or from writing output.
pub fn run_reports(
    source: &mut dyn DataSource,
    cli: &Cli,
    stdout: &mut dyn Write,
) -> Result<ReportSet> {
    let collection = cli.collection_config();
    info!("Starting report collection...");
    info!("Source: {}", source.safe_description());

    let settings = cli.output_settings();
    let report = match settings.format {
        OutputFormat::Text => match &settings.path {
            Some(path) => {
                let mut file = output::create_output_file(path)?;
                let report = stream_text(source, &collection, settings.max_rows, &mut file)?;
                info!("Output written to {}", path.display());
                report
            }
            None => stream_text(source, &collection, settings.max_rows, stdout)?,
        },
        OutputFormat::Json => {
            let report = collect_reports(source, &collection)?;
            output::write_json(&report, settings.path.as_deref(), stdout)?;
            report
        }
    };

    for warning in &report.collection_metadata.warnings {
        warn!("{}", warning);
    }
    info!(
        "✓ {} report(s) written in {} ms",
        report.report_count(),
        report.collection_metadata.collection_duration_ms
    );
    Ok(report)
}

fn stream_text(
    source: &mut dyn DataSource,
    collection: &CollectionConfig,
    max_rows: usize,
    out: &mut dyn Write,
) -> Result<ReportSet> {
    collect_reports_with(source, collection, |frame| {
        output::write_frame(frame, max_rows, out)
    })
}

/// Tests the connection and prints a confirmation line.
///
/// # Errors
/// Returns error if the connection test fails or output cannot be written.
pub fn run_test(source: &mut dyn DataSource, stdout: &mut dyn Write) -> Result<()> {
    info!("Testing data source connection...");
    source.test_connection()?;
    writeln!(
        stdout,
        "Connection to {} successful",
        source.safe_description()
    )
    .map_err(|e| QbReportError::io("Failed to write to stdout", e))?;
    Ok(())
}
