//! Record ingestion
//!
//! Turns raw feature batches into sample-joined [`FeatureRecord`]s, feeding
//! the protein support tracker and appending each sample's rows to its
//! scratch buffer. Per batch:
//!
//! 1. drop rows with non-positive (or missing) intensity
//! 2. drop rows whose condition is `Empty`
//! 3. canonicalize the peptide and drop those shorter than `min_aa`
//! 4. parse protein accessions and default the fraction to `1`
//! 5. propose peptide → protein support pairs
//! 6. join to the design; unmatched rows are counted and dropped
//! 7. append to the per-sample buffers

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::design::{spectrum_prefix, study_accession, ExperimentDesign};
use crate::feature::{parse_protein_accession, CanonicalCache, FeatureRecord, RawFeature};
use crate::scratch::{ScratchError, ScratchStore};
use crate::support::ProteinSupport;

/// Condition sentinel of unused channels
const EMPTY_CONDITION: &str = "Empty";

/// Counters of the ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Batches consumed
    pub batches: usize,
    /// Rows read from the source
    pub rows_read: usize,
    /// Rows with non-positive or missing intensity
    pub dropped_intensity: usize,
    /// Rows with the `Empty` condition
    pub dropped_empty_condition: usize,
    /// Rows whose canonical peptide is shorter than `min_aa`
    pub dropped_short_peptide: usize,
    /// Rows without a matching sample in the design
    pub dropped_unmatched_sample: usize,
    /// Rows appended to the sample buffers
    pub rows_buffered: usize,
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows in {} batches: {} buffered, dropped {} by intensity, {} empty condition, \
             {} short peptides, {} unmatched samples",
            self.rows_read,
            self.batches,
            self.rows_buffered,
            self.dropped_intensity,
            self.dropped_empty_condition,
            self.dropped_short_peptide,
            self.dropped_unmatched_sample
        )
    }
}

/// Batch-by-batch ingestion against a resolved design
pub struct Ingestor<'a> {
    design: &'a ExperimentDesign,
    min_aa: usize,
    cache: CanonicalCache,
    stats: IngestStats,
}

impl<'a> Ingestor<'a> {
    /// Create an ingestor dropping peptides shorter than `min_aa`
    pub fn new(design: &'a ExperimentDesign, min_aa: usize) -> Self {
        Self {
            design,
            min_aa,
            cache: CanonicalCache::new(),
            stats: IngestStats::default(),
        }
    }

    /// Ingest one batch, returning the number of rows buffered from it
    pub fn ingest<S>(
        &mut self,
        batch: Vec<RawFeature>,
        support: &mut ProteinSupport,
        scratch: &mut S,
    ) -> Result<usize, ScratchError>
    where
        S: ScratchStore<FeatureRecord>,
    {
        self.stats.batches += 1;
        self.stats.rows_read += batch.len();

        let mut kept = Vec::with_capacity(batch.len());
        for raw in batch {
            if raw.intensity.is_nan() || raw.intensity <= 0.0 {
                self.stats.dropped_intensity += 1;
                continue;
            }
            if raw.condition == EMPTY_CONDITION {
                self.stats.dropped_empty_condition += 1;
                continue;
            }
            let canonical = match raw.canonical.as_deref() {
                Some(sequence) => self.cache.canonical(sequence).to_string(),
                None => self.cache.canonical(&raw.peptidoform).to_string(),
            };
            if canonical.len() < self.min_aa {
                self.stats.dropped_short_peptide += 1;
                continue;
            }
            let protein = parse_protein_accession(&raw.protein_accessions);
            kept.push((raw, canonical, protein));
        }

        support.observe_batch(
            kept.iter()
                .map(|(_, canonical, protein)| (canonical.as_str(), protein.as_str())),
        );

        let mut order: Vec<String> = Vec::new();
        let mut by_sample: HashMap<String, Vec<FeatureRecord>> = HashMap::new();
        for (raw, canonical, protein) in kept {
            let channel = raw
                .channel
                .as_deref()
                .and_then(|c| self.design.resolve_channel(c));
            let Some(sample) = self
                .design
                .sample_for(spectrum_prefix(&raw.reference), channel)
            else {
                self.stats.dropped_unmatched_sample += 1;
                continue;
            };
            let sample = sample.to_string();

            let record = FeatureRecord {
                protein,
                peptidoform: raw.peptidoform,
                canonical,
                charge: raw.charge,
                intensity: raw.intensity,
                run: raw.run,
                condition: raw.condition,
                bio_replicate: raw.bio_replicate,
                fraction: raw.fraction.unwrap_or_else(|| "1".to_string()),
                channel,
                study: study_accession(&sample).to_string(),
                sample: sample.clone(),
                score: raw.score,
            };
            by_sample
                .entry(sample)
                .or_insert_with_key(|key| {
                    order.push(key.clone());
                    Vec::new()
                })
                .push(record);
        }

        let mut buffered = 0;
        for sample in order {
            if let Some(rows) = by_sample.remove(&sample) {
                buffered += rows.len();
                scratch.append(&sample, &rows)?;
            }
        }
        self.stats.rows_buffered += buffered;
        debug!(
            "Batch {}: buffered {} rows, canonical cache holds {} sequences",
            self.stats.batches,
            buffered,
            self.cache.len()
        );
        Ok(buffered)
    }

    /// Counters so far
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Finish ingestion, returning the counters
    pub fn finish(self) -> IngestStats {
        self.stats
    }
}
