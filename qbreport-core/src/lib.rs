//! Core data structures, ODBC adapter and report operations for qbreport.
//!
//! qbreport reads two reports from a QuickBooks Online data source through
//! the vendor's ODBC driver: the list of queryable tables and the full
//! customer table. The driver does all protocol work; this crate issues the
//! catalog and data queries and reshapes the results into [`Frame`]s.
//!
//! # Security Guarantees
//! - Connection strings are held in zeroizing memory and redacted before
//!   they reach logs, errors or report files
//! - Only catalog requests and `SELECT` statements are issued
//! - Table names are validated as plain identifiers before use in SQL text
//!
//! # Architecture
//! - [`adapters::DataSource`] abstracts the connection; [`adapters::create_source`]
//!   opens the ODBC implementation
//! - [`reports`] holds the operations, written against the trait
//! - [`models`] holds the tabular containers

pub mod adapters;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod security;
pub mod validation;

// Re-export commonly used types
pub use adapters::{
    CatalogMode, CollectionConfig, ConnectionConfig, DataSource, create_source,
    list_installed_sources,
};
pub use error::{QbReportError, Result};
pub use logging::init_logging;
pub use models::{Cell, Frame, ReportSet, RowSet, SourceInventory, TableRows};
pub use reports::{
    collect_reports, collect_reports_with, provide_customer_list, provide_table_list,
    provide_table_rows,
};
