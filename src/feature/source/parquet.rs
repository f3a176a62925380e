use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::utils::{
    get_float64_column, get_int64_column, get_joined_list_column, get_optional_float64_column,
    get_optional_string_column, get_string_column, optional_f64, optional_string,
};
use super::{FeatureBatches, FeatureSource, SourceError};
use crate::feature::RawFeature;
use crate::schema::columns;

/// Streaming reader over a quantms.io feature parquet file
///
/// Batches are decoded on demand, so memory usage is bounded by
/// `batch_size * row_size` regardless of the file size.
#[derive(Debug, Clone)]
pub struct ParquetFeatureSource {
    path: PathBuf,
    batch_size: usize,
}

impl ParquetFeatureSource {
    /// Open a feature parquet file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SourceError::MissingSource(path.to_path_buf()));
        }
        Ok(Self {
            path: path.to_path_buf(),
            batch_size: super::DEFAULT_BATCH_SIZE,
        })
    }

    /// Set the number of rows per batch
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl FeatureSource for ParquetFeatureSource {
    fn batches(&self, samples: Option<&HashSet<String>>) -> Result<FeatureBatches<'_>, SourceError> {
        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
            .with_batch_size(self.batch_size)
            .build()?;
        debug!("Streaming {} in batches of {}", self.path.display(), self.batch_size);

        let samples = samples.cloned();
        Ok(Box::new(reader.map(move |batch| {
            let batch = batch?;
            let mut features = features_from_batch(&batch)?;
            if let Some(samples) = &samples {
                super::retain_samples(&mut features, samples);
            }
            Ok(features)
        })))
    }
}

/// Convert one record batch of the feature table into raw features
pub(crate) fn features_from_batch(batch: &RecordBatch) -> Result<Vec<RawFeature>, SourceError> {
    let proteins = get_joined_list_column(batch, columns::PROTEIN_ACCESSIONS)?;
    let peptidoforms = get_string_column(batch, columns::PEPTIDOFORM)?;
    let sequences = get_optional_string_column(batch, columns::SEQUENCE)?;
    let charges = get_int64_column(batch, columns::PRECURSOR_CHARGE)?;
    let intensities = get_float64_column(batch, columns::INTENSITY)?;
    let references = get_string_column(batch, columns::REFERENCE_FILE_NAME)?;
    let runs = get_optional_string_column(batch, columns::RUN)?;
    let conditions = get_string_column(batch, columns::CONDITION)?;
    let replicates = get_optional_string_column(batch, columns::BIOLOGICAL_REPLICATE)?;
    let fractions = get_optional_string_column(batch, columns::FRACTION)?;
    let channels = get_optional_string_column(batch, columns::CHANNEL)?;
    let labels = get_optional_string_column(batch, columns::ISOTOPE_LABEL_TYPE)?;
    let samples = get_optional_string_column(batch, columns::SAMPLE_ACCESSION)?;
    let scores = get_optional_float64_column(batch, columns::SEARCH_ENGINE_SCORE)?;

    let mut features = Vec::with_capacity(batch.num_rows());
    for idx in 0..batch.num_rows() {
        let reference = optional_string(Some(&references), idx).unwrap_or_default();
        features.push(RawFeature {
            protein_accessions: proteins[idx].clone(),
            peptidoform: optional_string(Some(&peptidoforms), idx).unwrap_or_default(),
            canonical: optional_string(sequences.as_ref(), idx),
            charge: if charges.is_null(idx) { 0 } else { charges.value(idx) as i32 },
            // null intensities are dropped by the positive-intensity filter
            intensity: optional_f64(Some(&intensities), idx).unwrap_or(f64::NAN),
            run: optional_string(runs.as_ref(), idx).unwrap_or_else(|| reference.clone()),
            reference,
            condition: optional_string(Some(&conditions), idx).unwrap_or_default(),
            bio_replicate: optional_string(replicates.as_ref(), idx).unwrap_or_default(),
            fraction: optional_string(fractions.as_ref(), idx),
            channel: optional_string(channels.as_ref(), idx),
            isotope_label: optional_string(labels.as_ref(), idx),
            sample_accession: optional_string(samples.as_ref(), idx),
            score: optional_f64(scores.as_ref(), idx),
        });
    }
    Ok(features)
}
