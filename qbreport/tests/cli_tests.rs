//! CLI tests for qbreport.
//!
//! Drives the commands against an in-memory data source and checks the
//! rendered output, connection-string resolution and password handling.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use clap::Parser;
use qbreport::{
    CONNECTION_STRING_ENV, Cli, Command, OutputFormat, connection_config,
    resolve_connection_string, run_reports, run_test,
};
use qbreport_core::{DataSource, QbReportError, Result, RowSet};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Answers from a fixed QuickBooks-like catalog; requests starting with
/// `fail_on` are rejected.
#[derive(Debug, Default)]
struct FakeSource {
    fail_on: Option<&'static str>,
    calls: Vec<String>,
}

fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

impl FakeSource {
    fn record(&mut self, call: String) -> Result<()> {
        self.calls.push(call.clone());
        if self.fail_on.is_some_and(|prefix| call.starts_with(prefix)) {
            return Err(QbReportError::query_failed(
                call,
                std::io::Error::other("driver rejected the request"),
            ));
        }
        Ok(())
    }
}

impl DataSource for FakeSource {
    fn test_connection(&mut self) -> Result<()> {
        self.record("test".to_string())
    }

    fn list_tables(&mut self) -> Result<RowSet> {
        self.record("SP_TABLES".to_string())?;
        let tables = [
            ("Customer", Some("Customers of the company")),
            ("Invoice", Some("Sales invoices")),
            ("Account", None),
        ];
        Ok(RowSet {
            columns: labels(&[
                "TABLE_CAT",
                "TABLE_SCHEM",
                "TABLE_NAME",
                "TABLE_TYPE",
                "REMARKS",
            ]),
            rows: tables
                .iter()
                .map(|(name, remarks)| {
                    cells(&[
                        Some("CData"),
                        Some("QuickBooksOnline"),
                        Some(*name),
                        Some("TABLE"),
                        *remarks,
                    ])
                })
                .collect(),
        })
    }

    fn list_columns(&mut self, table: &str) -> Result<RowSet> {
        self.record(format!("SP_COLUMNS {table}"))?;
        Ok(RowSet {
            columns: labels(&["TABLE_CAT", "TABLE_SCHEM", "TABLE_NAME", "COLUMN_NAME"]),
            rows: ["Id", "DisplayName", "Balance"]
                .iter()
                .map(|column| {
                    cells(&[
                        Some("CData"),
                        Some("QuickBooksOnline"),
                        Some(table),
                        Some(*column),
                    ])
                })
                .collect(),
        })
    }

    fn query(&mut self, statement: &str) -> Result<RowSet> {
        self.record(statement.to_string())?;
        Ok(RowSet {
            columns: labels(&["Id", "DisplayName", "Balance"]),
            rows: vec![
                cells(&[Some("1"), Some("Amy's Bird Sanctuary"), Some("239.00")]),
                cells(&[Some("2"), Some("Bill's Windsurf Shop"), Some("85.00")]),
                cells(&[Some("3"), Some("Cool Cars"), None]),
            ],
        })
    }

    fn safe_description(&self) -> String {
        "DSN=QuickBooks Online Data 64-Bit;PWD=****;".to_string()
    }
}

fn parse(args: &[&str]) -> Cli {
    temp_env::with_var_unset(CONNECTION_STRING_ENV, || {
        Cli::try_parse_from(std::iter::once("qbreport").chain(args.iter().copied()))
            .expect("arguments should parse")
    })
}

const TABLE_LIST_TEXT: &str = concat!(
    "       Name               Description\n",
    "0  Customer  Customers of the company\n",
    "1   Invoice            Sales invoices\n",
    "2   Account                      None\n",
);

const CUSTOMER_TEXT: &str = concat!(
    "   Id           DisplayName  Balance\n",
    "0   1  Amy's Bird Sanctuary   239.00\n",
    "1   2  Bill's Windsurf Shop    85.00\n",
    "2   3             Cool Cars     None\n",
);

// =============================================================================
// Report commands
// =============================================================================

#[test]
fn test_default_command_prints_both_reports() {
    let cli = parse(&[]);
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    let report = run_reports(&mut source, &cli, &mut stdout).unwrap();

    assert_eq!(report.report_count(), 2);
    assert_eq!(
        String::from_utf8(stdout).unwrap(),
        format!("{TABLE_LIST_TEXT}{CUSTOMER_TEXT}")
    );
    assert_eq!(
        source.calls,
        vec!["SP_TABLES", "SP_COLUMNS Customer", "SELECT * FROM Customer"]
    );
}

#[test]
fn test_tables_command_only_lists_tables() {
    let cli = parse(&["tables"]);
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    run_reports(&mut source, &cli, &mut stdout).unwrap();

    assert_eq!(String::from_utf8(stdout).unwrap(), TABLE_LIST_TEXT);
    assert_eq!(source.calls, vec!["SP_TABLES"]);
}

#[test]
fn test_customers_command_uses_table_option() {
    let cli = parse(&["customers", "--table", "Invoice"]);
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    let report = run_reports(&mut source, &cli, &mut stdout).unwrap();

    assert!(report.table_list.is_none());
    assert_eq!(report.table_rows.unwrap().table_name, "Invoice");
    assert_eq!(
        source.calls,
        vec!["SP_COLUMNS Invoice", "SELECT * FROM Invoice"]
    );
}

#[test]
fn test_invalid_table_issues_no_query() {
    let cli = parse(&["customers", "--table", "Customer; DROP TABLE x"]);
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    assert!(run_reports(&mut source, &cli, &mut stdout).is_err());
    assert!(source.calls.is_empty());
    assert!(stdout.is_empty());
}

#[test]
fn test_options_accepted_after_subcommand() {
    let cli = parse(&[
        "customers",
        "--table",
        "Invoice",
        "--format",
        "json",
        "--catalog",
        "odbc",
        "--max-rows",
        "5",
    ]);

    assert_eq!(cli.command(), Command::Customers);
    assert_eq!(cli.table, "Invoice");
    assert_eq!(cli.output.format, OutputFormat::Json);
    assert_eq!(cli.output.max_rows, 5);
    assert_eq!(cli.connection.catalog, qbreport::CatalogArg::Odbc);
}

#[test]
fn test_table_catalog_failure_writes_nothing() {
    let cli = parse(&[]);
    let mut source = FakeSource {
        fail_on: Some("SP_TABLES"),
        ..FakeSource::default()
    };
    let mut stdout = Vec::new();

    let err = run_reports(&mut source, &cli, &mut stdout).unwrap_err();
    assert!(matches!(err, QbReportError::Query { .. }));
    assert!(stdout.is_empty());
}

#[test]
fn test_customer_failure_keeps_table_list_output() {
    let cli = parse(&[]);
    let mut source = FakeSource {
        fail_on: Some("SELECT"),
        ..FakeSource::default()
    };
    let mut stdout = Vec::new();

    let err = run_reports(&mut source, &cli, &mut stdout).unwrap_err();

    assert!(matches!(err, QbReportError::Query { .. }));
    assert_eq!(String::from_utf8(stdout).unwrap(), TABLE_LIST_TEXT);
}

#[test]
fn test_json_failure_writes_nothing() {
    let cli = parse(&["--format", "json"]);
    let mut source = FakeSource {
        fail_on: Some("SELECT"),
        ..FakeSource::default()
    };
    let mut stdout = Vec::new();

    assert!(run_reports(&mut source, &cli, &mut stdout).is_err());
    assert!(stdout.is_empty());
}

#[test]
fn test_text_output_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");
    let cli = parse(&["tables", "--output", path.to_str().unwrap()]);
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    run_reports(&mut source, &cli, &mut stdout).unwrap();

    assert!(stdout.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), TABLE_LIST_TEXT);
}

#[test]
fn test_json_output_to_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    let cli = parse(&["--format", "json", "--output", path.to_str().unwrap()]);
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    run_reports(&mut source, &cli, &mut stdout).unwrap();
    assert!(stdout.is_empty(), "file output must not touch stdout");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["format_version"], "1.0");
    assert_eq!(json["table_list"]["columns"], serde_json::json!(["Name", "Description"]));
    assert_eq!(json["table_rows"]["table_name"], "Customer");
    assert_eq!(json["table_rows"]["frame"]["rows"].as_array().unwrap().len(), 3);
    assert!(json["table_rows"]["frame"]["rows"][2][2].is_null());
    assert_eq!(
        json["collection_metadata"]["data_source"],
        "DSN=QuickBooks Online Data 64-Bit;PWD=****;"
    );
}

#[test]
fn test_test_command_reports_success() {
    let mut source = FakeSource::default();
    let mut stdout = Vec::new();

    run_test(&mut source, &mut stdout).unwrap();

    assert_eq!(
        String::from_utf8(stdout).unwrap(),
        "Connection to DSN=QuickBooks Online Data 64-Bit;PWD=****; successful\n"
    );
    assert_eq!(source.calls, vec!["test"]);
}

// =============================================================================
// Connection string resolution
// =============================================================================

#[test]
fn test_env_connection_string() {
    temp_env::with_var(CONNECTION_STRING_ENV, Some("DSN=Sandbox;PWD=x;"), || {
        let cli = Cli::try_parse_from(["qbreport"]).unwrap();
        let resolved = resolve_connection_string(&cli.connection).unwrap();
        assert_eq!(resolved.expose(), "DSN=Sandbox;PWD=x;");
    });
}

#[test]
fn test_connection_string_file_overrides_env() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "  DSN=FromFile;UID=me;PWD=secret;  ").unwrap();

    temp_env::with_var(CONNECTION_STRING_ENV, Some("DSN=FromEnv;"), || {
        let cli = Cli::try_parse_from([
            "qbreport",
            "--connection-string-file",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        let resolved = resolve_connection_string(&cli.connection).unwrap();
        assert_eq!(resolved.expose(), "DSN=FromFile;UID=me;PWD=secret;");
    });
}

#[test]
fn test_empty_connection_string_file_rejected() {
    let file = NamedTempFile::new().unwrap();
    let cli = parse(&["--connection-string-file", file.path().to_str().unwrap()]);

    let err = resolve_connection_string(&cli.connection).unwrap_err();
    assert!(matches!(err, QbReportError::Configuration { .. }));
}

#[test]
fn test_missing_connection_string_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let cli = parse(&["--connection-string-file", missing.to_str().unwrap()]);

    let err = resolve_connection_string(&cli.connection).unwrap_err();
    assert!(matches!(err, QbReportError::Io { .. }));
}

// =============================================================================
// Credential handling
// =============================================================================

#[test]
fn test_prompted_password_is_added_and_redacted() {
    let cli = parse(&["--prompt-password"]);

    let config = connection_config(&cli.connection, || Ok("s3cret".to_string())).unwrap();

    assert_eq!(
        config.connection_string.expose(),
        "DSN=QuickBooks Online Data 64-Bit;PWD=s3cret;"
    );
    assert!(!config.safe_description().contains("s3cret"));
    assert!(!format!("{config:?}").contains("s3cret"));
}

#[test]
fn test_prompted_password_replaces_existing() {
    let cli = parse(&["--connection-string", "DSN=qb;PWD=old;", "--prompt-password"]);

    let config = connection_config(&cli.connection, || Ok("new".to_string())).unwrap();
    assert_eq!(config.connection_string.expose(), "DSN=qb;PWD=new;");
}

#[test]
fn test_empty_prompted_password_rejected() {
    let cli = parse(&["--prompt-password"]);
    let err = connection_config(&cli.connection, || Ok(String::new())).unwrap_err();
    assert!(matches!(err, QbReportError::Configuration { .. }));
}

#[test]
fn test_password_read_failure() {
    let cli = parse(&["--prompt-password"]);
    let err = connection_config(&cli.connection, || {
        Err(std::io::Error::other("no terminal"))
    })
    .unwrap_err();
    assert!(matches!(err, QbReportError::Io { .. }));
}

#[test]
fn test_password_prompt_skipped_without_flag() {
    let cli = parse(&[]);
    let config = connection_config(&cli.connection, || unreachable!()).unwrap();
    assert_eq!(
        config.connection_string.expose(),
        "DSN=QuickBooks Online Data 64-Bit;"
    );
}
