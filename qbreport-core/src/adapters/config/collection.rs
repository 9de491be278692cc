//! Report collection settings.

use crate::validation::validate_table_name;
use serde::{Deserialize, Serialize};

/// Table whose rows are reported when no other table is requested.
pub const DEFAULT_TABLE: &str = "Customer";

/// Which reports a run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Table whose columns and rows are fetched
    pub table_name: String,
    /// Produce the `Name`/`Description` table list
    pub include_table_list: bool,
    /// Produce the full contents of `table_name`
    pub include_table_rows: bool,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE.to_string(),
            include_table_list: true,
            include_table_rows: true,
        }
    }
}

impl CollectionConfig {
    /// Only the table list.
    pub fn table_list_only() -> Self {
        Self {
            include_table_rows: false,
            ..Self::default()
        }
    }

    /// Only the rows of `table_name`.
    pub fn table_rows_only(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            include_table_list: false,
            include_table_rows: true,
        }
    }

    /// Builder method to set the table name.
    pub fn with_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Validates collection settings.
    ///
    /// # Errors
    /// Returns error if no report is selected or the table name is not a plain
    /// identifier.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.include_table_list && !self.include_table_rows {
            return Err(crate::error::QbReportError::configuration(
                "at least one report must be selected",
            ));
        }
        if self.include_table_rows {
            validate_table_name(&self.table_name)?;
        }
        Ok(())
    }
}
