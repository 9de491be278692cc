//! Configuration types for data sources and report collection.
//!
//! - `ConnectionConfig`: driver connection string, timeouts, catalog mode
//! - `CollectionConfig`: which reports to produce and for which table
//!
//! # Security
//! The connection string is held in a zeroizing [`crate::security::ConnectionString`]
//! and only ever displayed in redacted form.

mod collection;
mod connection;

pub use collection::{CollectionConfig, DEFAULT_TABLE};
pub use connection::{CatalogMode, ConnectionConfig, DEFAULT_CONNECTION_STRING};
