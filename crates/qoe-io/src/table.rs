//! In-memory flow table with on-demand numeric column parsing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::IoError;

/// A whole CSV held in memory after a single read.
///
/// Cells stay as text until a column is requested as numbers, so tables
/// with free-text columns such as `exp_id` load without error.
#[derive(Debug, Clone)]
pub struct FlowTable {
    path: PathBuf,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl FlowTable {
    pub(crate) fn new(path: PathBuf, columns: Vec<String>, rows: Vec<csv::StringRecord>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            path,
            columns,
            index,
            rows,
        }
    }

    /// Source file of this table.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }

    /// Header names in file order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The subset of `names` absent from the header, in the given order.
    #[must_use]
    pub fn missing_columns<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    fn column_index(&self, name: &str) -> Result<usize, IoError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| IoError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    fn parse_cell(&self, row_index: usize, column: &str, raw: &str) -> Result<Option<f64>, IoError> {
        let trimmed = raw.trim();
        if is_missing(trimmed) {
            return Ok(None);
        }
        let value: f64 = trimmed.parse().map_err(|_| IoError::NonNumericValue {
            path: self.path.clone(),
            row_index,
            column: column.to_string(),
            raw: raw.to_string(),
        })?;
        Ok((!value.is_nan()).then_some(value))
    }

    /// Parse one column as numbers; empty and `NaN` cells become `None`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::MissingColumn`] | `name` is not in the header |
    /// | [`IoError::NonNumericValue`] | A non-empty cell is not a number |
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>, IoError> {
        let col = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, record)| self.parse_cell(row_index, name, record.get(col).unwrap_or("")))
            .collect()
    }

    /// Like [`FlowTable::numeric_column`], but unparseable cells become `None`.
    ///
    /// Returns the values and the number of cells that failed to parse.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::MissingColumn`] if `name` is not in the header.
    pub fn numeric_column_lenient(&self, name: &str) -> Result<(Vec<Option<f64>>, usize), IoError> {
        let col = self.column_index(name)?;
        let mut n_invalid = 0;
        let values = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, record)| {
                self.parse_cell(row_index, name, record.get(col).unwrap_or(""))
                    .unwrap_or_else(|_| {
                        n_invalid += 1;
                        None
                    })
            })
            .collect();
        Ok((values, n_invalid))
    }

    /// Row-major matrix of the given columns, in the given order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FlowTable::numeric_column`].
    pub fn feature_matrix(&self, names: &[&str]) -> Result<Vec<Vec<Option<f64>>>, IoError> {
        let cols: Vec<usize> = names
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<_, _>>()?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, record)| {
                cols.iter()
                    .zip(names)
                    .map(|(&c, name)| self.parse_cell(row_index, name, record.get(c).unwrap_or("")))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

/// Spellings of a missing value in the exported tables.
fn is_missing(cell: &str) -> bool {
    cell.is_empty() || matches!(cell, "NA" | "N/A" | "null" | "NULL" | "None")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(header: &[&str], rows: &[&[&str]]) -> FlowTable {
        FlowTable::new(
            PathBuf::from("mem.csv"),
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter().map(|r| csv::StringRecord::from(r.to_vec())).collect(),
        )
    }

    #[test]
    fn shape_and_lookup() {
        let t = table(&["ping", "exp_id"], &[&["10", "a"], &["20", "b"]]);
        assert_eq!(t.shape(), (2, 2));
        assert!(t.has_column("ping"));
        assert!(!t.has_column("pps"));
        assert_eq!(t.missing_columns(&["exp_id", "pps", "ping", "x"]), vec!["pps", "x"]);
    }

    #[test]
    fn missing_cells_become_none() {
        let t = table(&["ping"], &[&["12.5"], &[""], &["NaN"], &["nan"], &["NA"], &[" 7 "]]);
        assert_eq!(
            t.numeric_column("ping").unwrap(),
            vec![Some(12.5), None, None, None, None, Some(7.0)]
        );
    }

    #[test]
    fn text_in_numeric_column_is_an_error() {
        let t = table(&["ping"], &[&["1"], &["fast"]]);
        let err = t.numeric_column("ping").unwrap_err();
        assert!(matches!(err, IoError::NonNumericValue { row_index: 1, ref raw, .. } if raw == "fast"));
    }

    #[test]
    fn lenient_column_counts_bad_cells() {
        let t = table(&["score"], &[&["3"], &["n/a?"], &["5"], &[""]]);
        let (values, n_invalid) = t.numeric_column_lenient("score").unwrap();
        assert_eq!(values, vec![Some(3.0), None, Some(5.0), None]);
        assert_eq!(n_invalid, 1);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let t = table(&["ping"], &[]);
        assert!(matches!(
            t.numeric_column("pps"),
            Err(IoError::MissingColumn { ref column, .. }) if column == "pps"
        ));
    }

    #[test]
    fn feature_matrix_follows_requested_order() {
        let t = table(&["a", "b", "c"], &[&["1", "2", "3"], &["4", "", "6"]]);
        let m = t.feature_matrix(&["c", "a", "b"]).unwrap();
        assert_eq!(m, vec![vec![Some(3.0), Some(1.0), Some(2.0)], vec![Some(6.0), Some(4.0), None]]);
    }
}
