//! Per-sample accumulation buffers
//!
//! A [`ScratchStore`] is an append-only, re-readable store keyed by sample
//! name. Ingestion appends every batch; later passes read one sample's full
//! history at a time. Callers guarantee that all appends for a key happen
//! before the first read of that key.
//!
//! Two backends are provided:
//!
//! - [`MemoryScratch`]: a map of vectors, for tests and small inputs
//! - [`DiskScratch`]: one CSV file per key, optionally in a temporary directory
//!   that is removed on drop

mod disk;
mod memory;


pub use disk::DiskScratch;
pub use memory::MemoryScratch;

/// Errors that can occur in a scratch store
#[derive(Debug, thiserror::Error)]
pub enum ScratchError {
    /// I/O error
    #[error("Scratch I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Record (de)serialization error
    #[error("Scratch record error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Append/read capability over per-key record buffers
pub trait ScratchStore<T> {
    /// Append rows to the buffer of `key`, creating it if needed
    fn append(&mut self, key: &str, rows: &[T]) -> Result<(), ScratchError>;

    /// Read back every row appended to `key`, in append order.
    ///
    /// A key that was never written yields an empty vector.
    fn read_all(&self, key: &str) -> Result<Vec<T>, ScratchError>;

    /// Whether anything was ever appended to `key`
    fn exists(&self, key: &str) -> bool;
}
