use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use regex::Regex;

use super::BatchCorrectionError;

/// How delimited text tables are read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    /// Field separator
    pub delimiter: u8,
    /// Lines starting with this byte are skipped
    pub comment: Option<u8>,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            comment: Some(b'#'),
        }
    }
}

/// A long-form text table kept as strings, so unknown columns survive a round trip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Regex equivalent of a shell-style file name pattern (`*` and `?`)
pub fn glob_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            c => expr.push_str(&regex::escape(&c.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr)
}

impl LongTable {
    /// Build a table from headers and rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Read a delimited table with a header line
    pub fn from_reader<R: Read>(reader: R, format: TableFormat) -> Result<Self, BatchCorrectionError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter)
            .comment(format.comment)
            .from_reader(reader);
        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|r| r.map(|record| record.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;
        Ok(Self { headers, rows })
    }

    /// Read one table file
    pub fn from_path<P: AsRef<Path>>(path: P, format: TableFormat) -> Result<Self, BatchCorrectionError> {
        Self::from_reader(File::open(path)?, format)
    }

    /// Read and concatenate every file of `folder` whose name matches `pattern`.
    ///
    /// Files are read in name order; headers are the union of all files in
    /// order of first appearance, and missing cells are empty.
    pub fn from_folder<P: AsRef<Path>>(
        folder: P,
        pattern: &str,
        format: TableFormat,
    ) -> Result<Self, BatchCorrectionError> {
        let folder = folder.as_ref();
        let matcher = glob_to_regex(pattern)?;
        let mut paths: Vec<PathBuf> = fs::read_dir(folder)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| matcher.is_match(n))
            })
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(BatchCorrectionError::NoInput {
                folder: folder.to_path_buf(),
                pattern: pattern.to_string(),
            });
        }

        let mut combined = LongTable::default();
        for path in &paths {
            debug!("Loading {}", path.display());
            combined.concat(Self::from_path(path, format)?);
        }
        info!(
            "Loaded {} rows from {} files in {}",
            combined.len(),
            paths.len(),
            folder.display()
        );
        Ok(combined)
    }

    /// Append the rows of `other`, aligning columns by name
    pub fn concat(&mut self, other: LongTable) {
        for header in &other.headers {
            if !self.headers.contains(header) {
                self.headers.push(header.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }
        let positions: HashMap<&str, usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();
        let width = self.headers.len();
        for row in other.rows {
            let mut aligned = vec![String::new(); width];
            for (header, value) in other.headers.iter().zip(row) {
                aligned[positions[header.as_str()]] = value;
            }
            self.rows.push(aligned);
        }
    }

    /// Column names
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column
    pub fn column_index(&self, name: &str) -> Result<usize, BatchCorrectionError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| BatchCorrectionError::MissingColumn(name.to_string()))
    }

    /// Values of a column
    pub fn column(&self, name: &str) -> Result<Vec<&str>, BatchCorrectionError> {
        let idx = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
            .collect())
    }

    /// Append a column; `values` must have one entry per row
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<(), BatchCorrectionError> {
        if values.len() != self.rows.len() {
            return Err(BatchCorrectionError::MalformedBatchCorrectionInput(format!(
                "column {} has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }
        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Write the table with a header line
    pub fn write<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), BatchCorrectionError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}
