use std::path::PathBuf;

/// Errors that can occur while resolving the experiment design
#[derive(Debug, thiserror::Error)]
pub enum DesignError {
    /// I/O error reading the design file
    #[error("Failed to read design file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("SDRF parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// The design file does not exist
    #[error("Design source not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// Missing required column in SDRF file
    #[error("Missing required SDRF column: {0}")]
    MissingColumn(String),

    /// The label set is neither label-free, TMT nor iTRAQ
    #[error("Unsupported label type, only label free, TMT and iTRAQ experiments are supported (labels: {})", .0.join(", "))]
    UnsupportedLabelType(Vec<String>),
}
