//! # Table Schemas
//!
//! Column names for both supported feature-table dialects and the Arrow
//! schema of the normalized peptide table.
//!
//! ## Feature input
//!
//! quantms.io feature parquet files use snake_case columns
//! (`protein_accessions`, `peptidoform`, `reference_file_name`, ...), while
//! MSstats CSV exports use CamelCase (`ProteinName`, `PeptideSequence`,
//! `Reference`, ...). Both are aligned onto [`crate::feature::RawFeature`]
//! by the batch sources.
//!
//! ## Peptide output
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | PeptideCanonical | Utf8 | Peptide without modifications |
//! | ProteinName | Utf8 | Protein accession(s) |
//! | SampleID | Utf8 | SDRF source name |
//! | NormIntensity | Float64 | Normalized intensity |
//! | Condition | Utf8 | Experimental condition |

mod builders;
/// Column name constants.
pub mod columns;


pub use builders::{create_peptide_schema, create_peptide_schema_arc};
pub use columns::*;
