//! Loader for column-oriented measurement CSV files.
//!
//! Measurements are stored column-wise, with a row label in the first field:
//!
//! ```text
//! No,A,B,C
//! 1,8,4,9
//! 2,6,6,5
//! 3,7,5,
//! ```
//!
//! Loading drops the label column, transposes the remaining cells and keeps
//! only numeric ones, yielding the series `[8, 6, 7, 4, 6, 5, 9, 5]`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;

use super::classify::{classify, Cell};

/// Field delimiter of the measurement files.
const DELIMITER: u8 = b',';

/// Quote character of the measurement files. Never used in practice,
/// so commas are never protected by quoting.
const QUOTE: u8 = b'|';

/// Errors that can occur while loading a series.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    /// A token the classifier accepted could not be parsed as a float.
    #[error("internal inconsistency: numeric token {token:?} failed to parse")]
    InconsistentToken { token: String },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Classified data rows, label column already removed. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Build a table from raw text rows, dropping the first field of each.
    pub fn from_text_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().skip(1).map(|s| classify(s.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Numeric tokens in position-major, then row order.
    ///
    /// Rows shorter than a position contribute nothing there.
    pub fn column_major_tokens(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.width()).flat_map(move |pos| {
            self.rows
                .iter()
                .filter_map(move |row| row.get(pos).and_then(Cell::as_numeric))
        })
    }
}

/// Flat, ordered series of measurement values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatSeries {
    values: Vec<f64>,
}

impl FlatSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values at `offset`, `offset + step`, `offset + 2 * step`, ...
    ///
    /// # Panics
    ///
    /// Panics if `step` is zero.
    pub fn stride(&self, offset: usize, step: usize) -> Vec<f64> {
        self.values.iter().skip(offset).step_by(step).copied().collect()
    }
}

impl From<Vec<f64>> for FlatSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// Read and classify every record from a reader.
///
/// No header handling: a textual header row simply yields no numeric cells.
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().skip(1).map(classify).collect());
    }

    Ok(RawTable { rows })
}

/// Transpose a table and flatten it into a series, dropping empty cells.
pub fn flatten_columns(table: &RawTable) -> Result<FlatSeries> {
    let values = table
        .column_major_tokens()
        .map(|token| {
            token.parse::<f64>().map_err(|_| LoaderError::InconsistentToken {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(FlatSeries::new(values))
}

/// Load a series from any reader.
pub fn load_series_from_reader<R: Read>(reader: R) -> Result<FlatSeries> {
    let table = read_raw_table(reader)?;
    flatten_columns(&table)
}

/// Load a measurement file into a flat series.
///
/// # Errors
///
/// Returns [`LoaderError::Io`] if the file cannot be opened, and
/// [`LoaderError::Csv`] if it cannot be read.
pub fn load_series<P: AsRef<Path>>(path: P) -> Result<FlatSeries> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let series = load_series_from_reader(BufReader::new(file))?;
    log::debug!("{}: {} values", path.display(), series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_ragged_rows_flatten_by_position() -> Result<()> {
        let table = RawTable::from_text_rows([
            vec!["0", "1", "2"],
            vec!["1", "3", "4"],
            vec!["2", "5", ""],
        ]);

        let series = flatten_columns(&table)?;
        assert_eq!(series.values(), &[1.0, 3.0, 5.0, 2.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_short_rows_are_padded() -> Result<()> {
        let table = RawTable::from_text_rows([vec!["a", "1"], vec!["b", "2", "3", "4"], vec!["c"]]);
        assert_eq!(table.width(), 3);

        let series = flatten_columns(&table)?;
        assert_eq!(series.values(), &[1.0, 2.0, 3.0, 4.0]);
        Ok(())
    }

    #[test]
    fn test_header_row_yields_nothing() -> Result<()> {
        let data = "No,A,B,C\n1,8,4,9\n2,6,6,5\n3,7,5,\n";
        let series = load_series_from_reader(data.as_bytes())?;
        assert_eq!(series.values(), &[8.0, 6.0, 7.0, 4.0, 6.0, 5.0, 9.0, 5.0]);
        Ok(())
    }

    #[test]
    fn test_double_quotes_are_plain_text() -> Result<()> {
        // '"' is not the quote character, so "1" is a non-numeric token.
        let data = "0,\"1\",2\n";
        let series = load_series_from_reader(data.as_bytes())?;
        assert_eq!(series.values(), &[2.0]);
        Ok(())
    }

    #[test]
    fn test_signed_and_partial_decimals() -> Result<()> {
        let data = "1,-2.50,+7\n2,3.,.5\n";
        let series = load_series_from_reader(data.as_bytes())?;
        assert_eq!(series.values(), &[-2.5, 3.0, 7.0, 0.5]);
        Ok(())
    }

    #[test]
    fn test_empty_input() -> Result<()> {
        let series = load_series_from_reader("".as_bytes())?;
        assert!(series.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_series_from_file_is_repeatable() -> Result<()> {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "No,A,B").unwrap();
        writeln!(file, "1,0.1,0.2").unwrap();
        writeln!(file, "2,0.3,").unwrap();
        file.flush().unwrap();

        let first = load_series(file.path())?;
        let second = load_series(file.path())?;
        assert_eq!(first.values(), &[0.1, 0.3, 0.2]);
        let first_bits: Vec<u64> = first.values().iter().map(|v| v.to_bits()).collect();
        let second_bits: Vec<u64> = second.values().iter().map(|v| v.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        match load_series(&path) {
            Err(LoaderError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_stride() {
        let series = FlatSeries::from(vec![8.0, 6.0, 7.0, 4.0, 6.0, 5.0, 9.0, 5.0]);
        assert_eq!(series.stride(0, 2), vec![8.0, 7.0, 6.0, 9.0]);
        assert_eq!(series.stride(1, 2), vec![6.0, 4.0, 5.0, 5.0]);
        assert_eq!(series.stride(2, 3), vec![7.0, 5.0]);
        assert!(series.stride(9, 2).is_empty());
    }
}
