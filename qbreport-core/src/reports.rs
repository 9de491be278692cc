//! The report operations.
//!
//! Each report issues catalog or data queries against a [`DataSource`] and
//! projects the fetched rows into a [`Frame`]. Nothing is cached between
//! calls.

use crate::{
    Result,
    adapters::{CollectionConfig, DataSource, catalog},
    error::QbReportError,
    models::{Cell, Frame, ReportSet, TableRows},
    validation::validate_table_name,
};
use std::time::Instant;
use tracing::{debug, info};

/// Column names of the table list report.
pub const TABLE_LIST_COLUMNS: [&str; 2] = ["Name", "Description"];

/// Lists every queryable table with its description.
///
/// Runs the table catalog query and keeps `TABLE_NAME` and `REMARKS` of each
/// catalog row, in driver order, under the columns `Name` and `Description`.
///
/// # Errors
/// Returns error if the catalog query fails or a catalog row has fewer than
/// five cells.
pub fn provide_table_list(source: &mut dyn DataSource) -> Result<Frame> {
    let catalog_rows = source.list_tables()?;
    debug!("Table catalog returned {} rows", catalog_rows.len());

    let mut frame = Frame::new(TABLE_LIST_COLUMNS);
    for (index, row) in catalog_rows.rows.into_iter().enumerate() {
        let name = cell_at(&row, catalog::TABLE_NAME_POSITION, index, "table catalog")?;
        let description = cell_at(&row, catalog::TABLE_REMARKS_POSITION, index, "table catalog")?;
        frame.push_row(vec![name, description])?;
    }

    info!("Found {} tables", frame.num_rows());
    Ok(frame)
}

/// Fetches every customer under the column names the catalog reports.
///
/// Equivalent to [`provide_table_rows`] for the `Customer` table.
///
/// # Errors
/// See [`provide_table_rows`].
pub fn provide_customer_list(source: &mut dyn DataSource) -> Result<Frame> {
    provide_table_rows(source, crate::adapters::DEFAULT_TABLE)
}

/// Fetches every row of `table` under the column names the catalog reports.
///
/// The column catalog query supplies the names (the `COLUMN_NAME` cell of
/// each row, in order), then `SELECT * FROM <table>` supplies the rows.
///
/// # Errors
/// Returns error if `table` is not a plain identifier, either query fails,
/// a catalog row lacks a column name, or the data rows are not as wide as
/// the catalog's column list.
pub fn provide_table_rows(source: &mut dyn DataSource, table: &str) -> Result<Frame> {
    validate_table_name(table)?;

    let columns = column_names(source, table)?;
    debug!("{} has {} catalog columns", table, columns.len());

    let data = source.query(&catalog::select_all_statement(table))?;
    if data.columns.len() != columns.len() {
        debug!(
            "{} catalog lists {} columns but the result set has {}",
            table,
            columns.len(),
            data.columns.len()
        );
    }

    let frame = Frame::from_rows(columns, data.rows)?;
    info!("Fetched {} rows from {}", frame.num_rows(), table);
    Ok(frame)
}

/// Column names of `table`, in catalog order.
///
/// # Errors
/// Returns error if the column catalog query fails or a row has no
/// `COLUMN_NAME`.
pub fn column_names(source: &mut dyn DataSource, table: &str) -> Result<Vec<String>> {
    let catalog_rows = source.list_columns(table)?;
    catalog_rows
        .rows
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            cell_at(&row, catalog::COLUMN_NAME_POSITION, index, "column catalog")?.ok_or_else(
                || {
                    QbReportError::shape(format!(
                        "column catalog row {} for {} has no column name",
                        index, table
                    ))
                },
            )
        })
        .collect()
}

/// Produces the reports selected by `config` from one open source.
///
/// # Errors
/// Returns the first error from configuration validation or any report.
pub fn collect_reports(
    source: &mut dyn DataSource,
    config: &CollectionConfig,
) -> Result<ReportSet> {
    collect_reports_with(source, config, |_| Ok(()))
}

/// Like [`collect_reports`], handing each frame to `on_frame` as soon as it
/// is built, table list first.
///
/// A frame already handed over stays delivered when a later report fails.
///
/// # Errors
/// Returns the first error from configuration validation, any report, or
/// `on_frame`.
pub fn collect_reports_with<F>(
    source: &mut dyn DataSource,
    config: &CollectionConfig,
    mut on_frame: F,
) -> Result<ReportSet>
where
    F: FnMut(&Frame) -> Result<()>,
{
    config.validate()?;

    let started = Instant::now();
    let mut report = ReportSet::new(source.safe_description());

    if config.include_table_list {
        let frame = provide_table_list(source)?;
        on_frame(&frame)?;
        report.table_list = Some(frame);
    }

    if config.include_table_rows {
        let frame = provide_table_rows(source, &config.table_name)?;
        if frame.is_empty() {
            report.add_warning(format!("{} returned no rows", config.table_name));
        }
        on_frame(&frame)?;
        report.table_rows = Some(TableRows {
            table_name: config.table_name.clone(),
            frame,
        });
    }

    report.collection_metadata.collection_duration_ms =
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(report)
}

fn cell_at(row: &[Cell], position: usize, index: usize, what: &str) -> Result<Cell> {
    row.get(position).cloned().ok_or_else(|| {
        QbReportError::shape(format!(
            "{} row {} has {} cells, expected at least {}",
            what,
            index,
            row.len(),
            position + 1
        ))
    })
}
