//! # Batch-Effect Corrector
//!
//! Removes batch effects from a long protein × sample table:
//!
//! 1. pivot the table to protein rows × sample columns ([`WideMatrix`])
//! 2. validate sample names ([`validate_sample_ids`]) and derive batch codes
//!    from the token before the first hyphen ([`batch_ids`])
//! 3. run a [`BatchCorrector`] over the zero-filled matrix
//! 4. pivot back and left-merge the corrected values as a new column
//!
//! ```rust
//! use pepnorm::batch_correction::{batch_ids, is_valid_sample_id};
//!
//! assert!(is_valid_sample_id("STUDY1-S01"));
//! assert!(!is_valid_sample_id("abc_123"));
//! assert_eq!(batch_ids(&["B-1", "A-1", "B-2"]), vec![0, 1, 0]);
//! ```

mod combat;
mod error;
mod matrix;
mod sample_id;
mod table;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use log::{info, warn};

pub use combat::{check_shape, BatchCorrector, EmpiricalBayes};
pub use error::BatchCorrectionError;
pub use matrix::{LongEntry, WideMatrix};
pub use sample_id::{batch_ids, is_valid_sample_id, validate_sample_ids};
pub use table::{glob_to_regex, LongTable, TableFormat};

use crate::schema::columns::IBAQ_BEC;

/// Column names of the table to correct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionColumns {
    /// Sample id column
    pub sample: String,
    /// Protein id column
    pub protein: String,
    /// Value column
    pub value: String,
}

impl Default for CorrectionColumns {
    fn default() -> Self {
        use crate::schema::columns::{IBAQ, IBAQ_PROTEIN_ID, IBAQ_SAMPLE_ID};
        Self {
            sample: IBAQ_SAMPLE_ID.to_string(),
            protein: IBAQ_PROTEIN_ID.to_string(),
            value: IBAQ.to_string(),
        }
    }
}

/// Correct `table` and return it with an appended `IbaqBec` column.
///
/// Rows whose value does not parse as a number take no part in the
/// correction. Rows with no corrected cell get an empty value.
pub fn correct_batches(
    table: &LongTable,
    columns: &CorrectionColumns,
    corrector: &dyn BatchCorrector,
) -> Result<LongTable, BatchCorrectionError> {
    let samples = table.column(&columns.sample)?;
    let proteins = table.column(&columns.protein)?;
    let values = table.column(&columns.value)?;

    let mut entries: Vec<LongEntry> = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for ((sample, protein), value) in samples.iter().zip(&proteins).zip(&values) {
        match value.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => {
                entries.push((protein.to_string(), sample.to_string(), v))
            }
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!("{} rows without a numeric {} value", skipped, columns.value);
    }

    let wide = WideMatrix::pivot_wider(&entries)?;
    validate_sample_ids(wide.columns())?;
    let batches = batch_ids(wide.columns());
    info!(
        "Correcting {} proteins x {} samples in {} batches",
        wide.rows().len(),
        wide.columns().len(),
        batches.iter().max().map_or(0, |b| b + 1)
    );

    let dense = wide.to_dense(0.0);
    let corrected = wide.with_dense(corrector.correct(&dense, &batches)?)?;

    let lookup: HashMap<(String, String), f64> = corrected
        .pivot_longer()
        .into_iter()
        .map(|(protein, sample, value)| ((sample, protein), value))
        .collect();
    let merged: Vec<String> = samples
        .iter()
        .zip(&proteins)
        .map(|(sample, protein)| {
            lookup
                .get(&(sample.to_string(), protein.to_string()))
                .map(|v| v.to_string())
                .unwrap_or_default()
        })
        .collect();

    let mut out = table.clone();
    out.push_column(IBAQ_BEC, merged)?;
    Ok(out)
}
