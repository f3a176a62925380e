//! Low-frequency peptide filter
//!
//! Counts, per canonical peptide, the number of samples it survives rollup in.
//! A peptide is kept when it appears in at least 20% of the samples and in
//! more than `min_sample` of them, where `min_sample` is 1 for multi-sample
//! datasets and 0 otherwise.

use std::collections::{HashMap, HashSet};

use log::info;

/// Minimum fraction of samples a peptide must be observed in
pub const MIN_SAMPLE_FRACTION: f64 = 0.2;

/// Per-peptide sample counter
#[derive(Debug, Clone, Default)]
pub struct PeptideFrequency {
    counts: HashMap<String, usize>,
}

impl PeptideFrequency {
    /// Create an empty counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the distinct peptides of one sample
    pub fn observe_sample<'a, I>(&mut self, peptides: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: HashSet<&str> = peptides.into_iter().collect();
        for peptide in distinct {
            *self.counts.entry(peptide.to_string()).or_default() += 1;
        }
    }

    /// Number of samples `peptide` was seen in
    pub fn count(&self, peptide: &str) -> usize {
        self.counts.get(peptide).copied().unwrap_or(0)
    }

    /// Keep the peptides passing the thresholds for `sample_count` samples
    pub fn freeze(self, sample_count: usize) -> FrequencyFilter {
        let min_sample = if sample_count > 1 { 1 } else { 0 };
        let total = self.counts.len();
        let keep: HashSet<String> = self
            .counts
            .into_iter()
            .filter(|(_, count)| {
                sample_count > 0
                    && *count as f64 / sample_count as f64 >= MIN_SAMPLE_FRACTION
                    && *count > min_sample
            })
            .map(|(peptide, _)| peptide)
            .collect();
        info!(
            "Frequency filter keeps {} of {} peptides over {} samples",
            keep.len(),
            total,
            sample_count
        );
        FrequencyFilter { keep }
    }
}

/// Frozen set of sufficiently frequent peptides
#[derive(Debug, Clone, Default)]
pub struct FrequencyFilter {
    keep: HashSet<String>,
}

impl FrequencyFilter {
    /// Whether `peptide` passes the filter
    pub fn contains(&self, peptide: &str) -> bool {
        self.keep.contains(peptide)
    }

    /// Number of peptides kept
    pub fn len(&self) -> usize {
        self.keep.len()
    }

    /// Whether no peptide passes
    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_in_ten_dropped_three_in_ten_kept() {
        let mut freq = PeptideFrequency::new();
        for sample in 0..10 {
            let mut peptides = vec!["COMMONPEPTIDE"];
            if sample == 0 {
                peptides.push("RAREPEPTIDE");
            }
            if sample < 3 {
                peptides.push("SOMEPEPTIDE");
            }
            freq.observe_sample(peptides);
        }
        let filter = freq.freeze(10);
        assert!(!filter.contains("RAREPEPTIDE"));
        assert!(filter.contains("SOMEPEPTIDE"));
        assert!(filter.contains("COMMONPEPTIDE"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_single_sample_keeps_everything() {
        let mut freq = PeptideFrequency::new();
        freq.observe_sample(["PEPTIDEK", "PEPTIDEK", "ANOTHERK"]);
        assert_eq!(freq.count("PEPTIDEK"), 1);
        let filter = freq.freeze(1);
        assert!(filter.contains("PEPTIDEK"));
        assert!(filter.contains("ANOTHERK"));
    }

    #[test]
    fn test_two_samples_need_both() {
        let mut freq = PeptideFrequency::new();
        freq.observe_sample(["PEPTIDEK", "ANOTHERK"]);
        freq.observe_sample(["PEPTIDEK"]);
        let filter = freq.freeze(2);
        assert!(filter.contains("PEPTIDEK"));
        assert!(!filter.contains("ANOTHERK"));
    }
}
