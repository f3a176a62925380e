//! # pepnorm - Streaming Peptide Normalization
//!
//! `pepnorm` turns a quantitative proteomics feature table (quantms.io
//! feature parquet or an MSstats CSV export) and its SDRF experiment design
//! into a table of normalized peptide intensities per sample, without ever
//! holding the full feature table in memory.
//!
//! ## Key Features
//!
//! - **Streaming ingestion**: features are read in bounded batches and
//!   buffered per sample in scratch storage.
//!
//! - **Unique-peptide evidence**: proteins supported by fewer than
//!   `min_unique` unambiguous peptides are dropped before normalization.
//!
//! - **Two-pass normalization**: quantile normalization against a running
//!   per-rank reference, or median normalization per run (per channel for
//!   isobaric data).
//!
//! - **Three-stage rollup**: best peptidoform per charge, sum over
//!   fractions and technical replicates, median over biological replicates.
//!
//! - **Batch-effect correction**: empirical Bayes (ComBat) correction of
//!   iBAQ tables across studies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pepnorm::prelude::*;
//!
//! let config = PipelineConfig {
//!     normalization: NormalizationMethod::Quantile,
//!     remove_low_frequency_peptides: true,
//!     ..Default::default()
//! };
//!
//! let design = ExperimentDesign::from_sdrf_file("PXD000001.sdrf.tsv")?;
//! let source = open_source("PXD000001.feature.parquet", config.batch_size)?;
//! let mut output = ParquetPeptideWriter::create("PXD000001.peptides.parquet")?;
//!
//! let report = Pipeline::new(config).run(source.as_ref(), &design, &mut output)?;
//! output.finish()?;
//! println!("{}", report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`design`]: SDRF parsing, label type and channel resolution
//! - [`feature`]: feature records, batch sources and canonicalization
//! - [`ingest`]: pass-1 ingestion into per-sample buffers
//! - [`scratch`]: in-memory and on-disk per-sample buffers
//! - [`support`]: unique-peptide support tracking
//! - [`normalize`]: quantile and run-median normalization
//! - [`rollup`]: peptidoform selection and replicate aggregation
//! - [`frequency`]: low-frequency peptide filter
//! - [`pipeline`]: the streaming entry point, sinks and run report
//! - [`batch_correction`]: iBAQ batch-effect correction
//! - [`schema`]: column names and the output Arrow schema

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod batch_correction;
pub mod design;
pub mod feature;
pub mod frequency;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod rollup;
pub mod schema;
pub mod scratch;
pub mod stats;
pub mod support;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch_correction::{
        correct_batches, BatchCorrectionError, BatchCorrector, CorrectionColumns,
        EmpiricalBayes, LongTable, TableFormat,
    };
    pub use crate::design::{DesignError, ExperimentDesign, LabelType};
    pub use crate::feature::{
        open_source, FeatureRecord, FeatureSource, ProteinFilter, RawFeature, SourceError,
    };
    pub use crate::normalize::NormalizationMethod;
    pub use crate::pipeline::{
        CsvPeptideWriter, ParquetPeptideWriter, PeptideSink, Pipeline, PipelineConfig,
        PipelineError, PipelineReport,
    };
    pub use crate::rollup::{PeptideIntensity, PeptidoformSelection};
    pub use crate::scratch::{DiskScratch, MemoryScratch, ScratchStore};
}
