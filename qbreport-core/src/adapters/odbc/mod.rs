//! ODBC data source built on `odbc-api`.
//!
//! # Module Structure
//! - `connection`: process-wide environment and connection setup
//! - `fetch`: cursor draining into [`RowSet`]s
//! - `enumeration`: installed drivers and DSNs
//!
//! # Driver Notes
//! - The driver owns authentication, query execution and marshaling; this
//!   adapter only issues catalog requests and `SELECT` statements
//! - Cells are fetched as text; SQL NULL stays `None`
//! - The connection is disconnected when the source is dropped

pub mod connection;
pub mod enumeration;
pub mod fetch;


use super::{CatalogMode, ConnectionConfig, DataSource, catalog};
use crate::{Result, error::QbReportError, models::RowSet};
use odbc_api::Connection;
use tracing::{debug, info};

/// A live ODBC connection.
pub struct OdbcSource {
    connection: Connection<'static>,
    catalog_mode: CatalogMode,
    description: String,
}

impl std::fmt::Debug for OdbcSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdbcSource")
            .field("description", &self.description)
            .field("catalog_mode", &self.catalog_mode)
            // connection string omitted
            .finish_non_exhaustive()
    }
}

impl OdbcSource {
    /// Opens a connection with the given configuration.
    ///
    /// # Errors
    /// Returns error if the driver manager or the driver refuses the
    /// connection.
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let connection = connection::open(config)?;
        Ok(Self {
            connection,
            catalog_mode: config.catalog_mode,
            description: config.safe_description(),
        })
    }

    /// Executes statement text and drains the result.
    ///
    /// Statements that produce no result set yield an empty [`RowSet`].
    fn execute(&self, statement: &str) -> Result<RowSet> {
        debug!("Executing: {}", statement);

        match self
            .connection
            .execute(statement, ())
            .map_err(|e| QbReportError::query_failed(statement, e))?
        {
            Some(cursor) => fetch::fetch_all(cursor, statement),
            None => {
                debug!("{} returned no result set", statement);
                Ok(RowSet::default())
            }
        }
    }
}

/// Error for a connection the driver reports as dead.
fn dead_connection_error() -> QbReportError {
    QbReportError::driver_failed(
        "Connection check failed",
        std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            "driver reports the connection as dead",
        ),
    )
}

impl DataSource for OdbcSource {
    fn test_connection(&mut self) -> Result<()> {
        let dead = self
            .connection
            .is_dead()
            .map_err(QbReportError::connection_failed)?;
        if dead {
            return Err(dead_connection_error());
        }

        match self.connection.database_management_system_name() {
            Ok(name) => info!("Connected to {}", name),
            Err(e) => debug!("DBMS name unavailable: {}", e),
        }
        Ok(())
    }

    fn list_tables(&mut self) -> Result<RowSet> {
        match self.catalog_mode {
            CatalogMode::Statement => self.execute(catalog::TABLES_COMMAND),
            CatalogMode::Odbc => {
                debug!("Calling SQLTables");
                let cursor = self
                    .connection
                    .tables("", "", "", "")
                    .map_err(|e| QbReportError::query_failed("SQLTables", e))?;
                fetch::fetch_all(cursor, "SQLTables")
            }
        }
    }

    fn list_columns(&mut self, table: &str) -> Result<RowSet> {
        match self.catalog_mode {
            CatalogMode::Statement => self.execute(&catalog::columns_command(table)),
            CatalogMode::Odbc => {
                debug!("Calling SQLColumns for {}", table);
                let cursor = self
                    .connection
                    .columns("", "", table, "")
                    .map_err(|e| QbReportError::query_failed("SQLColumns", e))?;
                fetch::fetch_all(cursor, "SQLColumns")
            }
        }
    }

    fn query(&mut self, statement: &str) -> Result<RowSet> {
        self.execute(statement)
    }

    fn safe_description(&self) -> String {
        self.description.clone()
    }

    fn close(self: Box<Self>) {
        debug!("Closing ODBC connection to {}", self.description);
        drop(self);
    }
}
