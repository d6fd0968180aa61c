//! Single-pass CSV reader for flow tables.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::table::FlowTable;
use crate::IoError;

/// Reads a windowed flow-statistics CSV into a [`FlowTable`].
///
/// The header row is required. A header-only file yields an empty table.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
pub struct FlowTableReader {
    path: PathBuf,
}

impl FlowTableReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    /// Size of the file on disk in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Metadata`] if the file cannot be inspected.
    pub fn file_size(&self) -> Result<u64, IoError> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| IoError::Metadata {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Read the whole file once.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<FlowTable, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;
        self.read_from(file)
    }

    /// Parse CSV text from any source; errors still name this reader's path.
    ///
    /// # Errors
    ///
    /// Same as [`FlowTableReader::read`], minus [`IoError::FileNotFound`].
    pub fn read_from<R: std::io::Read>(&self, input: R) -> Result<FlowTable, IoError> {
        // flexible(true) so ragged rows surface as InconsistentRowLength.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| self.csv_error(e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let expected = columns.len();
        debug!(expected, "read CSV header");

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            if record.len() != expected {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: record.len(),
                });
            }
            rows.push(record);
        }

        info!(n_rows = rows.len(), n_columns = expected, "flow table loaded");
        Ok(FlowTable::new(self.path.clone(), columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn reads_header_and_rows() {
        let f = write_csv("ping,self_rate_qoe_score,exp_id\n12.0,4,e1\n130,2,e2\n");
        let t = FlowTableReader::new(f.path()).read().unwrap();
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.columns(), &["ping", "self_rate_qoe_score", "exp_id"]);
        assert_eq!(t.numeric_column("ping").unwrap(), vec![Some(12.0), Some(130.0)]);
    }

    #[test]
    fn header_only_is_empty_table() {
        let f = write_csv("ping,exp_id\n");
        let t = FlowTableReader::new(f.path()).read().unwrap();
        assert_eq!(t.n_rows(), 0);
        assert_eq!(t.n_columns(), 2);
    }

    #[test]
    fn missing_file() {
        let err = FlowTableReader::new(Path::new("/nonexistent/window.csv"))
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn ragged_row() {
        let f = write_csv("a,b,c\n1,2,3\n4,5\n");
        let err = FlowTableReader::new(f.path()).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::InconsistentRowLength { row_index: 1, expected: 3, got: 2, .. }
        ));
    }

    #[test]
    fn reads_from_memory() {
        let t = FlowTableReader::new(Path::new("probe.csv"))
            .read_from("ping\n1\n2\n".as_bytes())
            .unwrap();
        assert_eq!(t.n_rows(), 2);
        assert_eq!(t.path(), Path::new("probe.csv"));
    }

    #[test]
    fn header_names_are_trimmed() {
        let f = write_csv(" ping , exp_id\n1,a\n");
        let t = FlowTableReader::new(f.path()).read().unwrap();
        assert!(t.has_column("ping"));
        assert!(t.has_column("exp_id"));
    }
}
