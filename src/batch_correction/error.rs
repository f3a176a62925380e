use std::path::PathBuf;

/// Errors that can occur during batch-effect correction
#[derive(Debug, thiserror::Error)]
pub enum BatchCorrectionError {
    /// Sample names that do not have the `STUDY-SAMPLE` structure
    #[error("Invalid sample IDs: {}", .0.join(", "))]
    InvalidSampleId(Vec<String>),

    /// Matrix and batch assignment disagree in shape
    #[error("Malformed batch correction input: {0}")]
    MalformedBatchCorrectionInput(String),

    /// A required column is missing from the table
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// The same (row, column) pair appears twice in a long table
    #[error("Duplicate entry for ({row}, {column})")]
    DuplicateEntry {
        /// Row key
        row: String,
        /// Column key
        column: String,
    },

    /// No input file matched the pattern
    #[error("No files matching '{pattern}' in {}", .folder.display())]
    NoInput {
        /// Searched folder
        folder: PathBuf,
        /// File name pattern
        pattern: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Invalid file pattern
    #[error("Pattern error: {0}")]
    RegexError(#[from] regex::Error),
}
