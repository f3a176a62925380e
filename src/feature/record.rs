use serde::{Deserialize, Serialize};

/// One feature row as yielded by a batch source, aligned to the internal column semantics.
///
/// Immutable once read; ingestion turns it into a [`FeatureRecord`] or drops it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    /// Protein accession(s), semicolon separated
    pub protein_accessions: String,
    /// Peptide sequence with modifications
    pub peptidoform: String,
    /// Bare sequence when the source already provides it
    pub canonical: Option<String>,
    /// Precursor charge
    pub charge: i32,
    /// Raw intensity
    pub intensity: f64,
    /// Spectrum file or spectrum reference
    pub reference: String,
    /// MS run
    pub run: String,
    /// Experimental condition
    pub condition: String,
    /// Biological replicate
    pub bio_replicate: String,
    /// Fraction, when the source has a fraction column
    pub fraction: Option<String>,
    /// Isobaric channel (label name or channel number)
    pub channel: Option<String>,
    /// Isotope label type
    pub isotope_label: Option<String>,
    /// Sample accession assigned upstream, used for source-side sample filtering
    pub sample_accession: Option<String>,
    /// Search engine score
    pub score: Option<f64>,
}

/// A feature after ingestion: canonicalized, accession-parsed and joined to its sample.
///
/// This is the unit stored in the per-sample scratch buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Parsed protein accession(s)
    pub protein: String,
    /// Peptide sequence with modifications
    pub peptidoform: String,
    /// Peptide sequence without modifications
    pub canonical: String,
    /// Precursor charge
    pub charge: i32,
    /// Raw intensity
    pub intensity: f64,
    /// MS run
    pub run: String,
    /// Experimental condition
    pub condition: String,
    /// Biological replicate
    pub bio_replicate: String,
    /// Fraction ("1" when the source has none)
    pub fraction: String,
    /// Resolved channel number of multiplexed data
    pub channel: Option<u32>,
    /// Sample (SDRF source name)
    pub sample: String,
    /// Study accession derived from the sample name
    pub study: String,
    /// Search engine score
    pub score: Option<f64>,
}
