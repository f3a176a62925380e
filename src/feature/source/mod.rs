//! Batch sources of raw features
//!
//! A [`FeatureSource`] yields the feature table as a lazy sequence of
//! batches. Only one batch is materialized at a time.
//!
//! ## Supported inputs
//!
//! - **quantms.io parquet** ([`ParquetFeatureSource`]): list or string
//!   `protein_accessions`, optional `sequence`, `channel`, `sample_accession`
//! - **MSstats CSV** ([`CsvFeatureSource`]): plain or gzip-compressed
//! - **In-memory** ([`MemorySource`]): pre-built batches, mostly for tests

mod error;
mod msstats;
mod parquet;
mod utils;

use std::collections::HashSet;
use std::path::Path;

pub use error::SourceError;
pub use msstats::CsvFeatureSource;
pub use parquet::ParquetFeatureSource;

use super::RawFeature;

/// Default number of rows per batch
pub const DEFAULT_BATCH_SIZE: usize = 1_000_000;

/// A lazy, fallible sequence of feature batches
pub type FeatureBatches<'a> = Box<dyn Iterator<Item = Result<Vec<RawFeature>, SourceError>> + 'a>;

/// Producer of raw feature batches
pub trait FeatureSource {
    /// Start streaming batches.
    ///
    /// When `samples` is given, rows whose `sample_accession` is known and not
    /// in the set are removed before the batch is yielded.
    fn batches(&self, samples: Option<&HashSet<String>>) -> Result<FeatureBatches<'_>, SourceError>;
}

/// Open a feature file, choosing the reader from its extension.
///
/// `.parquet` files are read with [`ParquetFeatureSource`], everything else
/// (`.csv`, `.tsv`, `.csv.gz`, ...) with [`CsvFeatureSource`].
pub fn open_source<P: AsRef<Path>>(
    path: P,
    batch_size: usize,
) -> Result<Box<dyn FeatureSource>, SourceError> {
    let path = path.as_ref();
    let is_parquet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));

    if is_parquet {
        Ok(Box::new(
            ParquetFeatureSource::open(path)?.with_batch_size(batch_size),
        ))
    } else {
        Ok(Box::new(CsvFeatureSource::open(path)?.with_batch_size(batch_size)))
    }
}

/// Feature batches held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    batches: Vec<Vec<RawFeature>>,
}

impl MemorySource {
    /// Create a source from pre-built batches
    pub fn new(batches: Vec<Vec<RawFeature>>) -> Self {
        Self { batches }
    }

    /// Split a flat list of features into batches of `batch_size` rows
    pub fn chunked(features: Vec<RawFeature>, batch_size: usize) -> Self {
        let batches = features
            .chunks(batch_size.max(1))
            .map(|chunk| chunk.to_vec())
            .collect();
        Self { batches }
    }
}

impl FeatureSource for MemorySource {
    fn batches(&self, samples: Option<&HashSet<String>>) -> Result<FeatureBatches<'_>, SourceError> {
        let samples = samples.cloned();
        Ok(Box::new(self.batches.iter().map(move |batch| {
            let mut batch = batch.clone();
            if let Some(samples) = &samples {
                retain_samples(&mut batch, samples);
            }
            Ok(batch)
        })))
    }
}

fn retain_samples(features: &mut Vec<RawFeature>, samples: &HashSet<String>) {
    features.retain(|f| {
        f.sample_accession
            .as_ref()
            .map_or(true, |accession| samples.contains(accession))
    });
}
