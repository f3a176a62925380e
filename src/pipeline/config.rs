use serde::{Deserialize, Serialize};

use crate::feature::source::DEFAULT_BATCH_SIZE;
use crate::feature::ProteinFilter;
use crate::normalize::NormalizationMethod;
use crate::rollup::PeptidoformSelection;

/// Settings of a normalization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum canonical peptide length
    pub min_aa: usize,
    /// Minimum number of unique peptides of a strong protein
    pub min_unique: usize,
    /// Drop peptides seen in too few samples
    pub remove_low_frequency_peptides: bool,
    /// Normalization strategy
    pub normalization: NormalizationMethod,
    /// Log2-transform intensities before normalization
    pub log2: bool,
    /// Best-peptidoform criterion
    pub selection: PeptidoformSelection,
    /// Drop decoy, contaminant and entrapment proteins
    pub remove_decoy_contaminants: bool,
    /// Protein accessions to drop
    pub remove_ids: Vec<String>,
    /// Rows per feature batch
    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_aa: 7,
            min_unique: 2,
            remove_low_frequency_peptides: false,
            normalization: NormalizationMethod::Quantile,
            log2: false,
            selection: PeptidoformSelection::Intensity,
            remove_decoy_contaminants: false,
            remove_ids: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Protein exclusion rules of this configuration
    pub fn protein_filter(&self) -> ProteinFilter {
        ProteinFilter {
            remove_ids: self.remove_ids.clone(),
            remove_decoy_contaminants: self.remove_decoy_contaminants,
        }
    }
}
