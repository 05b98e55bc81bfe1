//! Text rendering of reports.
//!
//! Values are written one per line so a block can be pasted straight into a
//! spreadsheet column.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::report::{MeasurementBlock, Report, ReportHeader};

/// Line printed before the unsliced dump of a degraded block.
pub const GRID_MISMATCH_WARNING: &str =
    "grid does not evenly divide the data; unsliced result follows";

/// Marker line closing each block.
pub const BLOCK_SEPARATOR: &str = "###";

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Format a value in shortest round-trip form, keeping `.0` on integral values.
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn write_header<W: Write>(writer: &mut W, header: &ReportHeader) -> io::Result<()> {
    writeln!(writer, "fname: {}", header.file)?;
    writeln!(writer, "{}", header.meta)?;
    writeln!(
        writer,
        "number of measurements per go: {}",
        header.measurements_per_go
    )?;
    writeln!(writer, "total number of measurements: {}", header.total_values)?;
    writeln!(
        writer,
        "number of measurements per row: {}",
        format_value(header.points_per_row)
    )?;
    writeln!(writer)
}

fn write_block<W: Write>(writer: &mut W, block: &MeasurementBlock) -> io::Result<()> {
    writeln!(writer, "pass {}, measurement {}", block.pass, block.measurement)?;
    if block.degraded {
        writeln!(writer, "{GRID_MISMATCH_WARNING}")?;
    }
    write_values(writer, &block.values)?;
    writeln!(writer, "{BLOCK_SEPARATOR}")?;
    writeln!(writer)?;
    writeln!(writer)
}

/// Write values one per line.
pub fn write_values<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    for &value in values {
        writeln!(writer, "{}", format_value(value))?;
    }
    Ok(())
}

/// Write a full report to any sink.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> io::Result<()> {
    write_header(writer, &report.header)?;
    for block in &report.blocks {
        write_block(writer, block)?;
    }
    Ok(())
}

/// Render a report to a string.
pub fn render_report(report: &Report) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_report(&mut buf, report);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path, creating parent directories.
pub fn create_report_file(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dirs(path)?;
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write a single report to a file.
pub fn write_report_file(path: &Path, report: &Report) -> Result<()> {
    let mut writer = create_report_file(path)?;
    let to_write_error = |e| WriteError::WriteFile {
        path: path.display().to_string(),
        source: e,
    };

    write_report(&mut writer, report).map_err(to_write_error)?;
    writer.flush().map_err(to_write_error)
}
