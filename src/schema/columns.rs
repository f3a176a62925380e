//! Column names as constants for type safety

// =============================================================================
// quantms.io feature parquet columns
// =============================================================================

/// Protein accessions (List<Utf8> or Utf8)
pub const PROTEIN_ACCESSIONS: &str = "protein_accessions";
/// Peptide sequence with modifications
pub const PEPTIDOFORM: &str = "peptidoform";
/// Bare peptide sequence (optional, recomputed when absent)
pub const SEQUENCE: &str = "sequence";
/// Precursor charge state
pub const PRECURSOR_CHARGE: &str = "precursor_charge";
/// Raw feature intensity
pub const INTENSITY: &str = "intensity";
/// MS run identifier
pub const RUN: &str = "run";
/// Isobaric channel label (e.g. "TMT126")
pub const CHANNEL: &str = "channel";
/// Experimental condition
pub const CONDITION: &str = "condition";
/// Biological replicate
pub const BIOLOGICAL_REPLICATE: &str = "biological_replicate";
/// Fraction identifier
pub const FRACTION: &str = "fraction";
/// Isotope label type (L, H, ...)
pub const ISOTOPE_LABEL_TYPE: &str = "isotope_label_type";
/// Spectrum file the feature was quantified in
pub const REFERENCE_FILE_NAME: &str = "reference_file_name";
/// Sample accession assigned upstream
pub const SAMPLE_ACCESSION: &str = "sample_accession";
/// Search engine score used for score-based peptidoform selection
pub const SEARCH_ENGINE_SCORE: &str = "search_engine_score";

// =============================================================================
// MSstats CSV columns
// =============================================================================

/// MSstats column names
pub mod msstats {
    /// Protein name(s), semicolon separated
    pub const PROTEIN_NAME: &str = "ProteinName";
    /// Modified peptide sequence
    pub const PEPTIDE_SEQUENCE: &str = "PeptideSequence";
    /// Bare peptide sequence, when already computed upstream
    pub const PEPTIDE_CANONICAL: &str = "PeptideCanonical";
    /// Precursor charge
    pub const PRECURSOR_CHARGE: &str = "PrecursorCharge";
    /// Raw intensity
    pub const INTENSITY: &str = "Intensity";
    /// Spectrum reference
    pub const REFERENCE: &str = "Reference";
    /// Condition
    pub const CONDITION: &str = "Condition";
    /// Run
    pub const RUN: &str = "Run";
    /// Biological replicate
    pub const BIO_REPLICATE: &str = "BioReplicate";
    /// Fraction
    pub const FRACTION: &str = "Fraction";
    /// Channel
    pub const CHANNEL: &str = "Channel";
    /// Isotope label type
    pub const ISOTOPE_LABEL_TYPE: &str = "IsotopeLabelType";
    /// Search engine score
    pub const SEARCH_SCORE: &str = "searchScore";
}

// =============================================================================
// Peptide output columns
// =============================================================================

/// Canonical peptide sequence
pub const PEPTIDE_CANONICAL: &str = "PeptideCanonical";
/// Protein name
pub const PROTEIN_NAME: &str = "ProteinName";
/// Sample identifier (SDRF source name)
pub const SAMPLE_ID: &str = "SampleID";
/// Normalized intensity
pub const NORM_INTENSITY: &str = "NormIntensity";
/// Condition
pub const OUTPUT_CONDITION: &str = "Condition";

// =============================================================================
// Batch correction columns
// =============================================================================

/// Default sample id column of iBAQ tables
pub const IBAQ_SAMPLE_ID: &str = "SampleID";
/// Default protein id column of iBAQ tables
pub const IBAQ_PROTEIN_ID: &str = "ProteinName";
/// Default iBAQ value column
pub const IBAQ: &str = "Ibaq";
/// Batch-corrected iBAQ column appended by the corrector
pub const IBAQ_BEC: &str = "IbaqBec";
