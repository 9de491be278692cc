//! Installed driver and DSN enumeration.

use super::connection::environment;
use crate::{
    Result,
    error::QbReportError,
    models::{DataSourceEntry, DriverEntry, SourceInventory},
};
use tracing::debug;

/// Lists drivers and data sources known to the driver manager.
///
/// # Errors
/// Returns error if the driver manager cannot be queried.
pub fn list_installed_sources() -> Result<SourceInventory> {
    let environment = environment()?;

    let drivers: Vec<DriverEntry> = environment
        .drivers()
        .map_err(|e| QbReportError::driver_failed("Failed to list ODBC drivers", e))?
        .into_iter()
        .map(|driver| DriverEntry {
            description: driver.description,
            attributes: driver.attributes.into_iter().collect(),
        })
        .collect();

    let data_sources: Vec<DataSourceEntry> = environment
        .data_sources()
        .map_err(|e| QbReportError::driver_failed("Failed to list ODBC data sources", e))?
        .into_iter()
        .map(|source| DataSourceEntry {
            name: source.server_name,
            driver: source.driver,
        })
        .collect();

    debug!(
        "Driver manager reports {} drivers and {} data sources",
        drivers.len(),
        data_sources.len()
    );

    Ok(SourceInventory {
        drivers,
        data_sources,
    })
}
