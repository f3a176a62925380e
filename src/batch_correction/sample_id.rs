use std::collections::HashMap;
use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use super::BatchCorrectionError;

fn sample_id_regex() -> &'static Regex {
    static SAMPLE_ID: OnceLock<Regex> = OnceLock::new();
    SAMPLE_ID.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]+(-[A-Za-z0-9]+)*$").expect("valid sample id regex")
    })
}

/// Whether `sample` is made of hyphen-separated alphanumeric tokens
pub fn is_valid_sample_id(sample: &str) -> bool {
    sample_id_regex().is_match(sample)
}

/// Check every sample name, reporting all offenders at once
pub fn validate_sample_ids<S: AsRef<str>>(samples: &[S]) -> Result<(), BatchCorrectionError> {
    let invalid: Vec<String> = samples
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !is_valid_sample_id(s))
        .map(str::to_string)
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        for sample in &invalid {
            warn!("Invalid sample ID: {}", sample);
        }
        Err(BatchCorrectionError::InvalidSampleId(invalid))
    }
}

/// Dense batch codes from the token before the first hyphen, by first appearance
pub fn batch_ids<S: AsRef<str>>(samples: &[S]) -> Vec<usize> {
    let mut codes: HashMap<&str, usize> = HashMap::new();
    samples
        .iter()
        .map(|sample| {
            let batch = crate::design::study_accession(sample.as_ref());
            let next = codes.len();
            *codes.entry(batch).or_insert(next)
        })
        .collect()
}
