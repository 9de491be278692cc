//! ODBC environment and connection setup.

use crate::{Result, adapters::ConnectionConfig, error::QbReportError};
use odbc_api::{Connection, ConnectionOptions, Environment};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

/// Returns the process-wide ODBC environment, allocating it on first use.
///
/// # Errors
/// Returns error if the driver manager cannot allocate an environment
/// handle, e.g. when no ODBC driver manager is installed.
pub fn environment() -> Result<&'static Environment> {
    static ENVIRONMENT: OnceLock<Environment> = OnceLock::new();

    if let Some(environment) = ENVIRONMENT.get() {
        return Ok(environment);
    }

    let environment = Environment::new()
        .map_err(|e| QbReportError::driver_failed("Failed to allocate ODBC environment", e))?;
    Ok(ENVIRONMENT.get_or_init(|| environment))
}

/// Converts an optional login timeout to whole seconds for the driver.
///
/// Sub-second remainders are dropped; `validate()` rejects timeouts below one
/// second. Values past `u32::MAX` seconds saturate.
pub fn login_timeout_secs(timeout: Option<Duration>) -> Option<u32> {
    timeout.map(|t| u32::try_from(t.as_secs()).unwrap_or(u32::MAX))
}

/// Opens a driver connection.
///
/// # Errors
/// Returns a connection error if the driver rejects the connection string or
/// the login times out.
pub fn open(config: &ConnectionConfig) -> Result<Connection<'static>> {
    let environment = environment()?;

    let mut options = ConnectionOptions::default();
    options.login_timeout_sec = login_timeout_secs(config.login_timeout);

    info!("Connecting to {}", config.safe_description());
    debug!("Login timeout: {:?}", options.login_timeout_sec);

    let connection = environment
        .connect_with_connection_string(config.connection_string.expose(), options)
        .map_err(QbReportError::connection_failed)?;

    info!("✓ Connection established");
    Ok(connection)
}
