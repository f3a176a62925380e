use std::collections::{BTreeSet, HashMap};

use super::BatchCorrectionError;

/// One cell of a long table: (row key, column key, value)
pub type LongEntry = (String, String, f64);

/// A row-keys × column-keys matrix with optional cells.
///
/// Row and column keys are kept sorted, so pivoting is independent of the
/// order of the long table.
#[derive(Debug, Clone, PartialEq)]
pub struct WideMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl WideMatrix {
    /// Pivot long entries to wide form.
    ///
    /// Fails with [`BatchCorrectionError::DuplicateEntry`] when a (row, column)
    /// pair appears twice.
    pub fn pivot_wider(entries: &[LongEntry]) -> Result<Self, BatchCorrectionError> {
        let rows: Vec<String> = entries
            .iter()
            .map(|(r, _, _)| r.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let columns: Vec<String> = entries
            .iter()
            .map(|(_, c, _)| c.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let row_index: HashMap<&str, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.as_str(), i)).collect();
        let col_index: HashMap<&str, usize> =
            columns.iter().enumerate().map(|(i, c)| (c.as_str(), i)).collect();

        let mut cells = vec![vec![None; columns.len()]; rows.len()];
        for (row, column, value) in entries {
            let cell = &mut cells[row_index[row.as_str()]][col_index[column.as_str()]];
            if cell.is_some() {
                return Err(BatchCorrectionError::DuplicateEntry {
                    row: row.clone(),
                    column: column.clone(),
                });
            }
            *cell = Some(*value);
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Back to long form, row-major, skipping empty cells
    pub fn pivot_longer(&self) -> Vec<LongEntry> {
        let mut entries = Vec::new();
        for (row, values) in self.rows.iter().zip(&self.cells) {
            for (column, value) in self.columns.iter().zip(values) {
                if let Some(value) = value {
                    entries.push((row.clone(), column.clone(), *value));
                }
            }
        }
        entries
    }

    /// Row keys
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column keys
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Cell at (row, column)
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.cells.get(row)?.get(column).copied().flatten()
    }

    /// Complete matrix with empty cells set to `fill`
    pub fn to_dense(&self, fill: f64) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|v| v.unwrap_or(fill)).collect())
            .collect()
    }

    /// Same keys, with every cell replaced from a dense matrix of the same shape
    pub fn with_dense(&self, values: Vec<Vec<f64>>) -> Result<Self, BatchCorrectionError> {
        if values.len() != self.rows.len() || values.iter().any(|r| r.len() != self.columns.len()) {
            return Err(BatchCorrectionError::MalformedBatchCorrectionInput(format!(
                "expected a {}x{} matrix",
                self.rows.len(),
                self.columns.len()
            )));
        }
        Ok(Self {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            cells: values
                .into_iter()
                .map(|row| row.into_iter().map(Some).collect())
                .collect(),
        })
    }
}
