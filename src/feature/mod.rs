//! Feature records, canonicalization and input sources
//!
//! This module covers everything that happens to a feature before it is
//! joined to a sample:
//!
//! - [`RawFeature`] and [`FeatureRecord`]: the row types before and after ingestion
//! - [`canonical_peptide`] and [`parse_protein_accession`]: sequence and accession cleanup
//! - [`ProteinFilter`]: contaminant/decoy and explicit protein removal
//! - [`source`]: streaming batch readers for parquet and MSstats inputs

mod filter;
mod peptide;
mod record;
pub mod source;

pub use filter::ProteinFilter;
pub use peptide::{canonical_peptide, parse_protein_accession, CanonicalCache};
pub use record::{FeatureRecord, RawFeature};
pub use source::{
    open_source, CsvFeatureSource, FeatureBatches, FeatureSource, MemorySource,
    ParquetFeatureSource, SourceError,
};
