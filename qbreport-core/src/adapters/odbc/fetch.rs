//! Draining cursors into row sets.

use crate::{Result, error::QbReportError, models::RowSet};
use odbc_api::Cursor;
use tracing::debug;

/// Fetches every remaining row of `cursor` as text.
///
/// Column labels come from the result-set metadata. Each cell is read with
/// `SQLGetData`, so values of any length are fetched whole; NULL becomes
/// `None`. Bytes that are not valid UTF-8 are replaced.
///
/// # Errors
/// Returns a query error, labelled with `statement`, if metadata or any row
/// cannot be read.
pub fn fetch_all<C: Cursor>(mut cursor: C, statement: &str) -> Result<RowSet> {
    let columns = cursor
        .column_names()
        .and_then(|names| names.collect::<std::result::Result<Vec<String>, _>>())
        .map_err(|e| QbReportError::query_failed(statement, e))?;

    let column_count = u16::try_from(columns.len()).map_err(|_| {
        QbReportError::shape(format!(
            "{} returned {} columns, more than ODBC can address",
            statement,
            columns.len()
        ))
    })?;

    let mut row_set = RowSet::new(columns);
    let mut buffer = Vec::new();

    while let Some(mut row) = cursor
        .next_row()
        .map_err(|e| QbReportError::query_failed(statement, e))?
    {
        let mut cells = Vec::with_capacity(usize::from(column_count));
        for column in 1..=column_count {
            buffer.clear();
            let not_null = row
                .get_text(column, &mut buffer)
                .map_err(|e| QbReportError::query_failed(statement, e))?;
            cells.push(not_null.then(|| String::from_utf8_lossy(&buffer).into_owned()));
        }
        row_set.rows.push(cells);
    }

    debug!(
        "{} returned {} rows x {} columns",
        statement,
        row_set.len(),
        column_count
    );
    Ok(row_set)
}
