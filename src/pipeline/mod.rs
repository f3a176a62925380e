//! # Normalization Pipeline
//!
//! The streaming entry point. A run threads explicit state objects through
//! four sequential passes:
//!
//! 1. **Ingestion**: feature batches are canonicalized, joined to samples and
//!    appended to per-sample scratch buffers while the [`ProteinSupport`]
//!    tracker accumulates. The tracker is then frozen into strong proteins.
//! 2. **Reference**: every sample buffer is re-read, restricted to strong
//!    proteins, transformed and folded into the normalization accumulator,
//!    which is then frozen.
//! 3. **Normalize and roll up**: each sample is read once more, protein
//!    filters applied, normalized and rolled up to peptide rows.
//! 4. **Output**: rows go to the [`PeptideSink`], after the frequency filter
//!    when it is enabled.
//!
//! ```rust,no_run
//! use pepnorm::design::ExperimentDesign;
//! use pepnorm::feature::open_source;
//! use pepnorm::pipeline::{CsvPeptideWriter, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let design = ExperimentDesign::from_sdrf_file("PXD000001.sdrf.tsv")?;
//! let source = open_source("PXD000001.feature.parquet", config.batch_size)?;
//! let mut output = CsvPeptideWriter::create("PXD000001.peptides.csv")?;
//!
//! let report = Pipeline::new(config).run(source.as_ref(), &design, &mut output)?;
//! output.finish()?;
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod report;
mod sink;

#[cfg(test)]
mod tests;

use std::collections::HashSet;
use std::time::Instant;

use log::{debug, info, warn};

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use report::PipelineReport;
pub use sink::{read_peptide_parquet, CsvPeptideWriter, ParquetPeptideWriter, PeptideSink};

use crate::design::ExperimentDesign;
use crate::feature::{FeatureRecord, FeatureSource, ProteinFilter};
use crate::frequency::PeptideFrequency;
use crate::ingest::Ingestor;
use crate::normalize::{NormalizationAccumulator, NormalizedFeature};
use crate::rollup::{rollup, PeptideIntensity};
use crate::scratch::{DiskScratch, ScratchStore};
use crate::support::{ProteinSupport, StrongProteins};

/// Peptide normalization run
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    filter: ProteinFilter,
}

impl Pipeline {
    /// Pipeline with the protein filter of `config`
    pub fn new(config: PipelineConfig) -> Self {
        let filter = config.protein_filter();
        Self { config, filter }
    }

    /// Replace the protein filter (e.g. one loaded from an id file)
    pub fn with_protein_filter(mut self, filter: ProteinFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Run configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run with temporary disk-backed sample buffers
    pub fn run<S: PeptideSink + ?Sized>(
        &self,
        source: &dyn FeatureSource,
        design: &ExperimentDesign,
        sink: &mut S,
    ) -> Result<PipelineReport, PipelineError> {
        let mut features: DiskScratch<FeatureRecord> = DiskScratch::temporary()?;
        let mut peptides: DiskScratch<PeptideIntensity> = DiskScratch::temporary()?;
        self.run_with_scratch(source, design, &mut features, &mut peptides, sink)
    }

    /// Run with caller-provided sample buffers
    pub fn run_with_scratch<F, P, S>(
        &self,
        source: &dyn FeatureSource,
        design: &ExperimentDesign,
        features: &mut F,
        peptides: &mut P,
        sink: &mut S,
    ) -> Result<PipelineReport, PipelineError>
    where
        F: ScratchStore<FeatureRecord>,
        P: ScratchStore<PeptideIntensity>,
        S: PeptideSink + ?Sized,
    {
        let start = Instant::now();
        let config = &self.config;
        info!(
            "Normalizing {} design with {} samples (method: {}, log2: {})",
            design.label(),
            design.samples().len(),
            config.normalization,
            config.log2
        );

        // Pass 1: ingestion
        let wanted: HashSet<String> = design.samples().iter().cloned().collect();
        let mut support = ProteinSupport::new();
        let mut ingestor = Ingestor::new(design, config.min_aa);
        for batch in source.batches(Some(&wanted))? {
            ingestor.ingest(batch?, &mut support, features)?;
        }
        let ingest = ingestor.finish();
        info!("Ingested {}", ingest);
        if ingest.dropped_unmatched_sample > 0 {
            warn!(
                "{} rows had no matching sample in the design",
                ingest.dropped_unmatched_sample
            );
        }

        let unique_peptides = support.unique_peptides();
        let ambiguous_peptides = support.ambiguous_peptides();
        let strong = support.freeze(config.min_unique);
        info!(
            "{} strong proteins with at least {} unique peptides ({} ambiguous peptides)",
            strong.len(),
            config.min_unique,
            ambiguous_peptides
        );

        // Pass 2: normalization reference
        let mut accumulator = NormalizationAccumulator::new(config.normalization, design.label());
        for sample in design.samples() {
            if !features.exists(sample) {
                continue;
            }
            let rows = self.strong_rows(features.read_all(sample)?, &strong);
            accumulator.observe_sample(&rows);
        }
        let normalizer = accumulator.freeze();
        if let Some(reference) = normalizer.quantile_reference() {
            debug!("Quantile reference holds {} ranks", reference.len());
        }

        // Pass 3: normalize and roll up
        let mut frequency = PeptideFrequency::new();
        let mut samples_processed = 0;
        let mut samples_skipped = 0;
        let mut rows_written = 0;
        for sample in design.samples() {
            let mut rows = self.strong_rows(features.read_all(sample)?, &strong);
            rows.retain(|r| self.filter.retains(&r.record.protein));
            normalizer.apply(&mut rows);
            let sample_peptides = rollup(rows, config.selection);
            if sample_peptides.is_empty() {
                debug!("{}: no peptides left, skipping", sample);
                samples_skipped += 1;
                continue;
            }
            samples_processed += 1;
            debug!("{}: {} peptide rows", sample, sample_peptides.len());

            if config.remove_low_frequency_peptides {
                frequency.observe_sample(sample_peptides.iter().map(|p| p.canonical.as_str()));
                peptides.append(sample, &sample_peptides)?;
            } else {
                sink.write_rows(&sample_peptides)?;
                rows_written += sample_peptides.len();
            }
        }

        // Pass 4: frequency filter
        let mut low_frequency_rows_removed = 0;
        if config.remove_low_frequency_peptides {
            let keep = frequency.freeze(design.samples().len());
            for sample in design.samples() {
                let mut rows = peptides.read_all(sample)?;
                let before = rows.len();
                rows.retain(|p| keep.contains(&p.canonical));
                low_frequency_rows_removed += before - rows.len();
                if !rows.is_empty() {
                    sink.write_rows(&rows)?;
                    rows_written += rows.len();
                }
            }
        }

        let report = PipelineReport {
            label: design.label(),
            samples: design.samples().len(),
            technical_replicates: design.technical_replicates(),
            ingest,
            unique_peptides,
            ambiguous_peptides,
            strong_proteins: strong.sorted().into_iter().map(str::to_string).collect(),
            normalization: config.normalization,
            quantile_reference: normalizer.quantile_reference().map(<[f64]>::to_vec),
            samples_processed,
            samples_skipped,
            low_frequency_rows_removed,
            rows_written,
        };
        info!("{} in {:.2?}", report, start.elapsed());
        Ok(report)
    }

    fn strong_rows(&self, records: Vec<FeatureRecord>, strong: &StrongProteins) -> Vec<NormalizedFeature> {
        records
            .into_iter()
            .filter(|r| strong.contains(&r.protein))
            .map(|r| NormalizedFeature::new(r, self.config.log2))
            .collect()
    }
}
