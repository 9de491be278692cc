//! Tabular data models.
//!
//! [`RowSet`] is a result exactly as the driver returned it. [`Frame`] is the
//! generic table the reports are projected into: named columns plus rows that
//! always match the column count. [`ReportSet`] bundles the frames with
//! collection metadata for output.

use crate::{Result, error::QbReportError};
use serde::{Deserialize, Serialize};

/// Report format version written to JSON output
pub const FORMAT_VERSION: &str = "1.0";

/// A single nullable text cell. SQL NULL is `None`.
pub type Cell = Option<String>;

/// A result set as fetched from the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    /// Column labels reported by the driver, in result order
    pub columns: Vec<String>,
    /// Fetched rows, in driver order
    pub rows: Vec<Vec<Cell>>,
}

impl RowSet {
    /// Creates an empty row set with the given column labels.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of fetched rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no rows were fetched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Generic table with named columns.
///
/// Every row holds exactly `columns().len()` cells; constructors reject data
/// of any other width. Duplicate column names are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FrameParts")]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct FrameParts {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TryFrom<FrameParts> for Frame {
    type Error = QbReportError;

    fn try_from(parts: FrameParts) -> Result<Self> {
        Self::from_rows(parts.columns, parts.rows)
    }
}

impl Frame {
    /// Creates an empty frame with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Builds a frame from rows, checking every row's width.
    ///
    /// # Errors
    /// Returns a shape error naming the first row whose cell count differs
    /// from the number of columns.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Cell>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frame = Self::new(columns);
        frame.rows.reserve(rows.len());
        for row in rows {
            frame.push_row(row)?;
        }
        Ok(frame)
    }

    /// Appends a row.
    ///
    /// # Errors
    /// Returns a shape error if the row width differs from the column count.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(QbReportError::shape(format!(
                "{} columns passed, passed data had {} columns (row {})",
                self.columns.len(),
                row.len(),
                self.rows.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in insertion order
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows(), self.num_columns())
    }

    /// Returns `true` when the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of the first column named `name`, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }
}

/// Rows of one data table together with the table they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRows {
    /// Queried table name
    pub table_name: String,
    /// Fetched rows under the catalog's column names
    pub frame: Frame,
}

/// Information about one report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub collected_at: chrono::DateTime<chrono::Utc>,
    pub collection_duration_ms: u64,
    /// Redacted description of the data source
    pub data_source: String,
    pub collector_version: String,
    pub warnings: Vec<String>,
}

/// The reports produced by one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSet {
    pub format_version: String,
    /// `Name`/`Description` list of queryable tables
    pub table_list: Option<Frame>,
    /// Full contents of the requested table
    pub table_rows: Option<TableRows>,
    pub collection_metadata: CollectionMetadata,
}

impl ReportSet {
    /// Creates an empty report set for the described data source.
    pub fn new(data_source: String) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            table_list: None,
            table_rows: None,
            collection_metadata: CollectionMetadata {
                collected_at: chrono::Utc::now(),
                collection_duration_ms: 0,
                data_source,
                collector_version: env!("CARGO_PKG_VERSION").to_string(),
                warnings: Vec::new(),
            },
        }
    }

    /// Adds a warning to the collection metadata
    pub fn add_warning(&mut self, warning: String) {
        self.collection_metadata.warnings.push(warning);
    }

    /// Number of frames present
    pub fn report_count(&self) -> usize {
        usize::from(self.table_list.is_some()) + usize::from(self.table_rows.is_some())
    }
}

/// An installed ODBC driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub description: String,
    /// Driver attributes from the driver manager, sorted by key
    pub attributes: std::collections::BTreeMap<String, String>,
}

/// A configured data source name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceEntry {
    pub name: String,
    /// Description of the driver the DSN uses
    pub driver: String,
}

/// Drivers and DSNs known to the driver manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInventory {
    pub drivers: Vec<DriverEntry>,
    pub data_sources: Vec<DataSourceEntry>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cells(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Some((*v).to_string())).collect()
    }

    #[test]
    fn test_frame_from_rows() {
        let frame = Frame::from_rows(
            ["Name", "Description"],
            vec![cells(&["Customer", "Customers"]), vec![Some("Invoice".into()), None]],
        )
        .unwrap();

        assert_eq!(frame.shape(), (2, 2));
        assert_eq!(frame.columns(), ["Name", "Description"]);
        assert_eq!(
            frame.column("Description").unwrap(),
            vec![Some("Customers"), None]
        );
        assert!(frame.column("Missing").is_none());
    }

    #[test]
    fn test_frame_rejects_width_mismatch() {
        let err = Frame::from_rows(["A", "B"], vec![cells(&["1", "2"]), cells(&["3"])])
            .unwrap_err();
        assert!(matches!(err, QbReportError::Shape { .. }));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_frame_no_columns() {
        let mut frame = Frame::new(Vec::<String>::new());
        assert!(frame.push_row(Vec::new()).is_ok());
        assert_eq!(frame.shape(), (1, 0));
        assert!(frame.push_row(cells(&["x"])).is_err());
    }

    #[test]
    fn test_frame_deserialize_validates_shape() {
        let ok: Frame =
            serde_json::from_str(r#"{"columns":["A"],"rows":[["1"],[null]]}"#).unwrap();
        assert_eq!(ok.num_rows(), 2);

        let bad = serde_json::from_str::<Frame>(r#"{"columns":["A"],"rows":[["1","2"]]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_report_set_creation() {
        let mut report = ReportSet::new("DSN=qb;".to_string());
        assert_eq!(report.format_version, FORMAT_VERSION);
        assert_eq!(report.report_count(), 0);

        report.table_list = Some(Frame::new(["Name", "Description"]));
        report.add_warning("Test warning".to_string());
        assert_eq!(report.report_count(), 1);
        assert_eq!(report.collection_metadata.warnings, vec!["Test warning"]);
    }

    #[test]
    fn test_row_set_len() {
        let mut rows = RowSet::new(vec!["A".into()]);
        assert!(rows.is_empty());
        rows.rows.push(vec![None]);
        assert_eq!(rows.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_frame_accepts_only_matching_width(
            width in 0usize..6,
            widths in proptest::collection::vec(0usize..6, 0..20),
        ) {
            let columns: Vec<String> = (0..width).map(|i| format!("c{i}")).collect();
            let rows: Vec<Vec<Cell>> = widths.iter().map(|w| vec![None; *w]).collect();
            let result = Frame::from_rows(columns, rows);

            if widths.iter().all(|w| *w == width) {
                let frame = result.unwrap();
                prop_assert_eq!(frame.shape(), (widths.len(), width));
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
