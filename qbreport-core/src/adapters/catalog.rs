//! Catalog command text and catalog result layout.
//!
//! The QuickBooks Online driver accepts catalog requests as statement text.
//! Their results use the same column order as the ODBC catalog functions, so
//! reports read cells by position regardless of how the request was issued.

/// Command listing every queryable table.
pub const TABLES_COMMAND: &str = "SP_TABLES";

/// Position of `TABLE_NAME` in a table catalog row.
pub const TABLE_NAME_POSITION: usize = 2;

/// Position of `REMARKS` in a table catalog row.
pub const TABLE_REMARKS_POSITION: usize = 4;

/// Position of `COLUMN_NAME` in a column catalog row.
pub const COLUMN_NAME_POSITION: usize = 3;

/// Command listing the columns of `table`.
///
/// `table` must already be validated as a plain identifier.
pub fn columns_command(table: &str) -> String {
    format!("SP_COLUMNS {table}")
}

/// Statement selecting every row and column of `table`.
///
/// `table` must already be validated as a plain identifier.
pub fn select_all_statement(table: &str) -> String {
    format!("SELECT * FROM {table}")
}
