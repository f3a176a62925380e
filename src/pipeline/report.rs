use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use super::PipelineError;
use crate::design::LabelType;
use crate::ingest::IngestStats;
use crate::normalize::NormalizationMethod;

/// Summary and diagnostics of a completed run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Label type of the design
    pub label: LabelType,
    /// Samples in the design
    pub samples: usize,
    /// Distinct technical replicates in the design
    pub technical_replicates: usize,
    /// Ingestion counters
    pub ingest: IngestStats,
    /// Peptides mapping to a single protein after ingestion
    pub unique_peptides: usize,
    /// Peptides evicted for mapping to several proteins
    pub ambiguous_peptides: usize,
    /// Frozen strong proteins, sorted
    pub strong_proteins: Vec<String>,
    /// Normalization strategy used
    pub normalization: NormalizationMethod,
    /// Frozen quantile reference distribution, largest rank first
    pub quantile_reference: Option<Vec<f64>>,
    /// Samples that produced peptide rows
    pub samples_processed: usize,
    /// Samples with no rows left after filtering
    pub samples_skipped: usize,
    /// Peptides removed by the frequency filter
    pub low_frequency_rows_removed: usize,
    /// Final peptide rows handed to the sink
    pub rows_written: usize,
}

impl PipelineReport {
    /// Write the report as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} design, {} samples: {} strong proteins, {} of {} samples processed, {} peptide rows written",
            self.label,
            self.samples,
            self.strong_proteins.len(),
            self.samples_processed,
            self.samples,
            self.rows_written
        )
    }
}
