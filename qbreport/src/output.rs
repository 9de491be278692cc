//! Report rendering and output.
//!
//! Text output imitates a DataFrame printout so the reports read the same as
//! an interactive session: an integer index, right-aligned cells, `None` for
//! NULL and head/tail truncation of long tables. JSON output is the
//! serialized [`ReportSet`].

use qbreport_core::{
    Frame, QbReportError, ReportSet, Result, SourceInventory, validation::ensure_redacted,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Rows shown when a frame is truncated, split between head and tail.
const TRUNCATED_ROWS: usize = 10;
const ELLIPSIS: &str = "...";
const INDEX_ELLIPSIS: &str = "..";
const COLUMN_GAP: &str = "  ";
/// Text shown for NULL cells
pub const NULL_TEXT: &str = "None";

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// DataFrame-style tables
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Where and how reports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// File to write instead of stdout
    pub path: Option<PathBuf>,
    /// Text truncation threshold, `0` disables truncation
    pub max_rows: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            path: None,
            max_rows: 60,
        }
    }
}

/// Renders a frame as a DataFrame-style text table, without trailing newline.
pub fn render_frame(frame: &Frame, max_rows: usize) -> String {
    if frame.num_columns() == 0 || frame.is_empty() {
        return render_empty(frame);
    }

    let total = frame.num_rows();
    let truncated = max_rows > 0 && total > max_rows;
    let visible: Vec<Option<usize>> = if truncated {
        let shown = TRUNCATED_ROWS.min(max_rows);
        let head = shown.div_ceil(2);
        let tail = shown / 2;
        (0..head)
            .map(Some)
            .chain(std::iter::once(None))
            .chain((total - tail..total).map(Some))
            .collect()
    } else {
        (0..total).map(Some).collect()
    };

    // First entry of each line is the index.
    let mut lines: Vec<Vec<&str>> = Vec::with_capacity(visible.len() + 1);
    let index_labels: Vec<String> = visible
        .iter()
        .map(|row| row.map_or_else(|| INDEX_ELLIPSIS.to_string(), |i| i.to_string()))
        .collect();

    lines.push(
        std::iter::once("")
            .chain(frame.columns().iter().map(String::as_str))
            .collect(),
    );
    for (row, label) in visible.iter().zip(&index_labels) {
        let mut line = Vec::with_capacity(frame.num_columns() + 1);
        line.push(label.as_str());
        match row {
            Some(i) => line.extend(
                frame.rows()[*i]
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or(NULL_TEXT)),
            ),
            None => line.extend(std::iter::repeat_n(ELLIPSIS, frame.num_columns())),
        }
        lines.push(line);
    }

    let mut widths = vec![0usize; frame.num_columns() + 1];
    for line in &lines {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = lines
        .iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(text, width)| format!("{:>width$}", text, width = width))
                .collect::<Vec<_>>()
                .join(COLUMN_GAP)
        })
        .collect::<Vec<_>>()
        .join("\n");

    if truncated {
        out.push_str(&format!(
            "\n\n[{} rows x {} columns]",
            total,
            frame.num_columns()
        ));
    }
    out
}

fn render_empty(frame: &Frame) -> String {
    let index = (0..frame.num_rows())
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Empty DataFrame\nColumns: [{}]\nIndex: [{}]",
        frame.columns().join(", "),
        index
    )
}

/// Writes one rendered frame followed by a newline.
///
/// # Errors
/// Returns error if the write fails.
pub fn write_frame(frame: &Frame, max_rows: usize, out: &mut dyn Write) -> Result<()> {
    let mut rendered = render_frame(frame, max_rows);
    rendered.push('\n');
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| QbReportError::io("Failed to write report", e))
}

/// Creates (or truncates) the output file.
///
/// # Errors
/// Returns error if the file cannot be created.
pub fn create_output_file(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path)
        .map_err(|e| QbReportError::io(format!("Failed to create {}", path.display()), e))
}

/// Serializes the report set as pretty JSON.
///
/// # Errors
/// Returns error if the data source description still carries a secret or
/// serialization fails.
pub fn render_json(report: &ReportSet) -> Result<String> {
    ensure_redacted(&report.collection_metadata.data_source)?;
    let mut json = serde_json::to_string_pretty(report).map_err(|e| {
        QbReportError::Serialization {
            context: "report set".to_string(),
            source: e,
        }
    })?;
    json.push('\n');
    Ok(json)
}

/// Renders the driver and DSN inventory.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render_inventory(inventory: &SourceInventory, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(inventory).map_err(|e| {
                QbReportError::Serialization {
                    context: "source inventory".to_string(),
                    source: e,
                }
            })?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = format!("ODBC drivers ({}):\n", inventory.drivers.len());
            for driver in &inventory.drivers {
                out.push_str(&format!("  {}\n", driver.description));
            }
            out.push_str(&format!(
                "\nODBC data sources ({}):\n",
                inventory.data_sources.len()
            ));
            for dsn in &inventory.data_sources {
                out.push_str(&format!("  {} ({})\n", dsn.name, dsn.driver));
            }
            Ok(out)
        }
    }
}

/// Writes the report set as one JSON document.
///
/// # Errors
/// Returns error if rendering fails or the output cannot be written.
pub fn write_json(report: &ReportSet, path: Option<&Path>, stdout: &mut dyn Write) -> Result<()> {
    emit(&render_json(report)?, path, stdout)
}

/// Writes rendered output to `path`, or to `stdout` when no path is set.
///
/// # Errors
/// Returns error if the write fails.
pub fn emit(rendered: &str, path: Option<&Path>, stdout: &mut dyn Write) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                QbReportError::io(format!("Failed to write to {}", path.display()), e)
            })?;
            tracing::info!("Output written to {}", path.display());
        }
        None => {
            stdout
                .write_all(rendered.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| QbReportError::io("Failed to write to stdout", e))?;
        }
    }
    Ok(())
}
