//! Data source connection configuration.

use crate::security::ConnectionString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection string used when none is configured.
///
/// Names the DSN the QuickBooks Online ODBC driver registers by default on
/// 64-bit systems.
pub const DEFAULT_CONNECTION_STRING: &str = "DSN=QuickBooks Online Data 64-Bit;";

/// How catalog queries are issued to the driver.
///
/// Both modes produce the standard ODBC catalog layout: `TABLE_NAME` at
/// position 2 and `REMARKS` at position 4 for tables, `COLUMN_NAME` at
/// position 3 for columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogMode {
    /// Send the driver's textual commands `SP_TABLES` / `SP_COLUMNS <table>`
    #[default]
    Statement,
    /// Call the ODBC catalog functions `SQLTables` / `SQLColumns`
    Odbc,
}

impl std::fmt::Display for CatalogMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Statement => write!(f, "statement"),
            Self::Odbc => write!(f, "odbc"),
        }
    }
}

/// Configuration for a data source connection.
///
/// # Example
/// ```rust
/// use qbreport_core::adapters::{CatalogMode, ConnectionConfig};
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("DSN=QuickBooks Online Data 64-Bit;")
///     .with_login_timeout(Duration::from_secs(30))
///     .with_catalog_mode(CatalogMode::Odbc);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Driver connection string (secret)
    pub connection_string: ConnectionString,
    /// Login timeout handed to the driver
    pub login_timeout: Option<Duration>,
    /// Catalog query style
    pub catalog_mode: CatalogMode,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_STRING)
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ConnectionConfig({}, catalog={})",
            self.connection_string.redacted(),
            self.catalog_mode
        )
    }
}

impl ConnectionConfig {
    /// Creates a config for the given connection string with no login timeout.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: ConnectionString::new(connection_string),
            login_timeout: None,
            catalog_mode: CatalogMode::default(),
        }
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if the connection string is blank or malformed, or a
    /// login timeout is under one second.
    pub fn validate(&self) -> crate::Result<()> {
        if self.connection_string.is_blank() {
            return Err(crate::error::QbReportError::configuration(
                "connection string cannot be empty",
            ));
        }

        self.connection_string.attributes()?;

        if self.login_timeout.is_some_and(|t| t.as_secs() == 0) {
            return Err(crate::error::QbReportError::configuration(
                "login_timeout must be at least one second",
            ));
        }

        Ok(())
    }

    /// Builder method to set the login timeout.
    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = Some(timeout);
        self
    }

    /// Builder method to set the catalog mode.
    pub fn with_catalog_mode(mut self, mode: CatalogMode) -> Self {
        self.catalog_mode = mode;
        self
    }

    /// Redacted description of the target, safe for logs and reports.
    pub fn safe_description(&self) -> String {
        self.connection_string.redacted()
    }
}
