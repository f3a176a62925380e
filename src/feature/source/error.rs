use std::path::PathBuf;

/// Errors that can occur while reading feature batches
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The feature file does not exist
    #[error("Feature source not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Column not found
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column present with an unusable type
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
