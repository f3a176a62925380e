use crate::design::DesignError;
use crate::feature::SourceError;
use crate::scratch::ScratchError;

/// Errors that abort a normalization run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Experiment design could not be resolved
    #[error("Design error: {0}")]
    DesignError(#[from] DesignError),

    /// Feature batches could not be read
    #[error("Feature source error: {0}")]
    SourceError(#[from] SourceError),

    /// Sample buffers could not be written or read back
    #[error("Scratch error: {0}")]
    ScratchError(#[from] ScratchError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
