//! Data source trait and factory.
//!
//! Reports talk to a [`DataSource`], never to the driver directly. The ODBC
//! implementation lives in [`odbc`]; tests substitute in-memory sources.
//!
//! # Module Structure
//! - `config`: Configuration types (ConnectionConfig, CollectionConfig)
//! - `catalog`: Catalog command text and result-set column positions
//! - `odbc`: ODBC adapter built on `odbc-api` (feature `odbc`)

use crate::{Result, models::RowSet};

pub mod catalog;
pub mod config;
#[cfg(feature = "odbc")]
pub mod odbc;

pub use config::{
    CatalogMode, CollectionConfig, ConnectionConfig, DEFAULT_CONNECTION_STRING, DEFAULT_TABLE,
};

/// A tabular data source reachable through a single connection.
///
/// All calls are synchronous and block until the driver has returned every
/// row. There is no retry: driver errors surface as-is.
///
/// # Object Safety
/// This trait is object-safe, allowing for dynamic dispatch through
/// `Box<dyn DataSource>`.
pub trait DataSource {
    /// Verifies the connection is alive.
    ///
    /// # Errors
    /// Returns error if the driver reports the connection as dead.
    fn test_connection(&mut self) -> Result<()>;

    /// Runs the table catalog query.
    ///
    /// The result follows the ODBC `SQLTables` layout: `TABLE_CAT`,
    /// `TABLE_SCHEM`, `TABLE_NAME`, `TABLE_TYPE`, `REMARKS`.
    ///
    /// # Errors
    /// Returns error if the driver rejects the catalog query.
    fn list_tables(&mut self) -> Result<RowSet>;

    /// Runs the column catalog query for `table`.
    ///
    /// The result follows the ODBC `SQLColumns` layout, with `COLUMN_NAME` at
    /// position 3, one row per column in ordinal order.
    ///
    /// # Errors
    /// Returns error if the driver rejects the catalog query.
    fn list_columns(&mut self, table: &str) -> Result<RowSet>;

    /// Executes a SQL statement and fetches every row.
    ///
    /// # Errors
    /// Returns error if execution or fetching fails.
    fn query(&mut self, statement: &str) -> Result<RowSet>;

    /// Description of the source with all secrets redacted.
    fn safe_description(&self) -> String;

    /// Closes the connection.
    fn close(self: Box<Self>) {}
}

/// Opens a data source for the given configuration.
///
/// # Errors
/// Returns error if the configuration is invalid, the connection cannot be
/// opened, or the crate was built without the `odbc` feature.
pub fn create_source(config: &ConnectionConfig) -> Result<Box<dyn DataSource>> {
    config.validate()?;

    #[cfg(feature = "odbc")]
    {
        let source = odbc::OdbcSource::connect(config)?;
        Ok(Box::new(source))
    }
    #[cfg(not(feature = "odbc"))]
    {
        Err(crate::error::QbReportError::unsupported_feature(
            "ODBC adapter",
            "Compile with --features odbc to enable ODBC support",
        ))
    }
}

/// Lists installed ODBC drivers and configured data source names.
///
/// # Errors
/// Returns error if the driver manager cannot be queried or the crate was
/// built without the `odbc` feature.
pub fn list_installed_sources() -> Result<crate::models::SourceInventory> {
    #[cfg(feature = "odbc")]
    {
        odbc::enumeration::list_installed_sources()
    }
    #[cfg(not(feature = "odbc"))]
    {
        Err(crate::error::QbReportError::unsupported_feature(
            "Driver enumeration",
            "Compile with --features odbc to enable ODBC support",
        ))
    }
}
