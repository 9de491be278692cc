//! In-memory data source shared by the integration tests.

#![allow(dead_code)]

use qbreport_core::{DataSource, QbReportError, Result, RowSet};

/// Data source answering from canned row sets and recording every request.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub tables: RowSet,
    pub columns: RowSet,
    pub data: RowSet,
    pub fail_on: Option<&'static str>,
    pub calls: Vec<String>,
}

impl FakeSource {
    /// A QuickBooks-like catalog with `Customer` and `Invoice` tables and
    /// three customers.
    pub fn quickbooks() -> Self {
        Self {
            tables: table_catalog(&[
                ("Customer", Some("Customers of the company")),
                ("Invoice", Some("Sales invoices")),
                ("Account", None),
            ]),
            columns: column_catalog("Customer", &["Id", "DisplayName", "Balance"]),
            data: RowSet {
                columns: labels(&["Id", "DisplayName", "Balance"]),
                rows: vec![
                    row(&[Some("1"), Some("Amy's Bird Sanctuary"), Some("239.00")]),
                    row(&[Some("2"), Some("Bill's Windsurf Shop"), Some("85.00")]),
                    row(&[Some("3"), Some("Cool Cars"), None]),
                ],
            },
            ..Self::default()
        }
    }

    fn check(&mut self, call: String) -> Result<()> {
        let fail = self.fail_on.is_some_and(|prefix| call.starts_with(prefix));
        self.calls.push(call.clone());
        if fail {
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
        self.check("test".to_string())
    }

    fn list_tables(&mut self) -> Result<RowSet> {
        self.check("SP_TABLES".to_string())?;
        Ok(self.tables.clone())
    }

    fn list_columns(&mut self, table: &str) -> Result<RowSet> {
        self.check(format!("SP_COLUMNS {table}"))?;
        Ok(self.columns.clone())
    }

    fn query(&mut self, statement: &str) -> Result<RowSet> {
        self.check(statement.to_string())?;
        Ok(self.data.clone())
    }

    fn safe_description(&self) -> String {
        "DSN=QuickBooks Online Data 64-Bit;PWD=****;".to_string()
    }
}

pub fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

pub fn row(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}

/// Builds a `SQLTables`-shaped catalog.
pub fn table_catalog(tables: &[(&str, Option<&str>)]) -> RowSet {
    RowSet {
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
                row(&[
                    Some("CData"),
                    Some("QuickBooksOnline"),
                    Some(*name),
                    Some("TABLE"),
                    *remarks,
                ])
            })
            .collect(),
    }
}

/// Builds a `SQLColumns`-shaped catalog for `table`.
pub fn column_catalog(table: &str, columns: &[&str]) -> RowSet {
    RowSet {
        columns: labels(&[
            "TABLE_CAT",
            "TABLE_SCHEM",
            "TABLE_NAME",
            "COLUMN_NAME",
            "DATA_TYPE",
            "TYPE_NAME",
        ]),
        rows: columns
            .iter()
            .map(|column| {
                row(&[
                    Some("CData"),
                    Some("QuickBooksOnline"),
                    Some(table),
                    Some(*column),
                    Some("12"),
                    Some("VARCHAR"),
                ])
            })
            .collect(),
    }
}
