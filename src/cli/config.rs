//! TOML configuration file support.
//!
//! Settings of both subcommands can live in a config file instead of flags.
//! Explicit flags win over file values, file values win over defaults:
//!
//! ```toml
//! # pepnorm.toml
//! [normalization]
//! method = "quantile"
//! min_aa = 7
//! min_unique = 2
//! log2 = false
//! remove_low_frequency_peptides = true
//! remove_decoy_contaminants = true
//! remove_ids = ["P02768"]
//!
//! [batch_correction]
//! pattern = "*ibaq.tsv"
//! separator = "\t"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use pepnorm::normalize::NormalizationMethod;
use pepnorm::rollup::PeptidoformSelection;

/// Root configuration structure for pepnorm.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings of `features2peptides`.
    #[serde(default)]
    pub normalization: NormalizationConfig,

    /// Settings of `correct-batches`.
    #[serde(default)]
    pub batch_correction: BatchCorrectionConfig,
}

/// Configuration for the features2peptides command.
#[derive(Debug, Default, Deserialize)]
pub struct NormalizationConfig {
    /// Normalization strategy.
    pub method: Option<NormalizationMethod>,

    /// Best-peptidoform criterion.
    pub selection: Option<PeptidoformSelection>,

    /// Minimum canonical peptide length.
    pub min_aa: Option<usize>,

    /// Minimum unique peptides per protein.
    pub min_unique: Option<usize>,

    /// Log2-transform intensities.
    pub log2: Option<bool>,

    /// Drop peptides seen in too few samples.
    pub remove_low_frequency_peptides: Option<bool>,

    /// Drop decoy, contaminant and entrapment proteins.
    pub remove_decoy_contaminants: Option<bool>,

    /// Protein accessions to drop.
    pub remove_ids: Option<Vec<String>>,

    /// Rows per feature batch.
    pub batch_size: Option<usize>,
}

/// Configuration for the correct-batches command.
#[derive(Debug, Default, Deserialize)]
pub struct BatchCorrectionConfig {
    /// File name pattern inside the input folder.
    pub pattern: Option<String>,

    /// Column separator of input and output.
    pub separator: Option<String>,

    /// Comment line prefix.
    pub comment: Option<String>,

    /// Sample id column.
    pub sample_id_column: Option<String>,

    /// Protein id column.
    pub protein_id_column: Option<String>,

    /// Value column.
    pub ibaq_column: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [normalization]
            method = "run-median"
            selection = "score"
            min_aa = 8
            min_unique = 3
            log2 = true
            remove_ids = ["P02768", "P01024"]
            batch_size = 5000

            [batch_correction]
            pattern = "*.tsv"
            separator = ","
        "#;

        let config = Config::from_str(toml).unwrap();
        let norm = &config.normalization;
        assert_eq!(norm.method, Some(NormalizationMethod::RunMedian));
        assert_eq!(norm.selection, Some(PeptidoformSelection::Score));
        assert_eq!(norm.min_aa, Some(8));
        assert_eq!(norm.min_unique, Some(3));
        assert_eq!(norm.log2, Some(true));
        assert_eq!(norm.remove_ids.as_deref().map(|ids| ids.len()), Some(2));
        assert_eq!(norm.batch_size, Some(5_000));
        assert_eq!(config.batch_correction.pattern.as_deref(), Some("*.tsv"));
        assert_eq!(config.batch_correction.separator.as_deref(), Some(","));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [normalization]
            min_unique = 1
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.normalization.min_unique, Some(1));
        assert_eq!(config.normalization.method, None);
        assert_eq!(config.batch_correction.pattern, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.normalization.min_aa, None);
        assert!(Config::load(None).unwrap().normalization.log2.is_none());
    }

    #[test]
    fn test_unknown_method_is_rejected() {
        let toml = r#"
            [normalization]
            method = "zscore"
        "#;
        assert!(Config::from_str(toml).is_err());
    }
}
