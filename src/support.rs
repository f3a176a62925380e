//! Protein support tracker
//!
//! Tracks, across ingestion batches, which canonical peptides map to exactly
//! one protein. A peptide that is ever seen with two different proteins is
//! tombstoned and never becomes a support signal again. After ingestion the
//! tracker is frozen into a [`StrongProteins`] set.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mapping {
    Unique(String),
    Ambiguous,
}

/// Accumulating peptide → protein support table
#[derive(Debug, Clone, Default)]
pub struct ProteinSupport {
    peptides: HashMap<String, Mapping>,
}

impl ProteinSupport {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one batch of (canonical peptide, protein) observations.
    ///
    /// Within the batch, only peptides with exactly one distinct protein
    /// propose a mapping; a batch-local ambiguity proposes nothing.
    pub fn observe_batch<'a, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut proposals: HashMap<&str, Option<&str>> = HashMap::new();
        for (peptide, protein) in pairs {
            proposals
                .entry(peptide)
                .and_modify(|current| {
                    if *current != Some(protein) {
                        *current = None;
                    }
                })
                .or_insert(Some(protein));
        }

        for (peptide, protein) in proposals {
            if let Some(protein) = protein {
                self.propose(peptide, protein);
            }
        }
    }

    /// Merge one peptide → protein proposal
    pub fn propose(&mut self, peptide: &str, protein: &str) {
        match self.peptides.entry(peptide.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(Mapping::Unique(protein.to_string()));
            }
            Entry::Occupied(mut entry) => {
                let conflicting =
                    matches!(entry.get(), Mapping::Unique(current) if current != protein);
                if conflicting {
                    entry.insert(Mapping::Ambiguous);
                }
            }
        }
    }

    /// Peptides currently mapped to a single protein
    pub fn unique_peptides(&self) -> usize {
        self.peptides
            .values()
            .filter(|m| matches!(m, Mapping::Unique(_)))
            .count()
    }

    /// Peptides evicted because they mapped to more than one protein
    pub fn ambiguous_peptides(&self) -> usize {
        self.peptides.len() - self.unique_peptides()
    }

    /// Protein currently supported by `peptide`
    pub fn protein_of(&self, peptide: &str) -> Option<&str> {
        match self.peptides.get(peptide) {
            Some(Mapping::Unique(protein)) => Some(protein),
            _ => None,
        }
    }

    /// Count surviving peptides per protein and keep those with at least `min_unique`
    pub fn freeze(self, min_unique: usize) -> StrongProteins {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for mapping in self.peptides.into_values() {
            if let Mapping::Unique(protein) = mapping {
                *counts.entry(protein).or_default() += 1;
            }
        }
        StrongProteins {
            proteins: counts
                .into_iter()
                .filter(|(_, count)| *count >= min_unique)
                .map(|(protein, _)| protein)
                .collect(),
        }
    }
}

/// Frozen set of proteins with enough unique peptides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrongProteins {
    proteins: HashSet<String>,
}

impl StrongProteins {
    /// Whether `protein` is strong
    pub fn contains(&self, protein: &str) -> bool {
        self.proteins.contains(protein)
    }

    /// Number of strong proteins
    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    /// Whether no protein is strong
    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    /// Strong proteins in sorted order
    pub fn sorted(&self) -> Vec<&str> {
        let mut proteins: Vec<&str> = self.proteins.iter().map(String::as_str).collect();
        proteins.sort_unstable();
        proteins
    }
}

impl FromIterator<String> for StrongProteins {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            proteins: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_unique_selects_strong_proteins() {
        let mut support = ProteinSupport::new();
        support.observe_batch([("p1", "A"), ("p2", "A"), ("p3", "B")]);

        let strong = support.freeze(2);
        assert!(strong.contains("A"));
        assert!(!strong.contains("B"));
        assert_eq!(strong.len(), 1);
    }

    #[test]
    fn test_eviction_across_batches_is_permanent() {
        let mut support = ProteinSupport::new();
        support.observe_batch([("p1", "A"), ("p2", "A"), ("p3", "B"), ("p4", "B")]);
        support.observe_batch([("p1", "B")]);
        support.observe_batch([("p1", "A")]);

        assert_eq!(support.protein_of("p1"), None);
        assert_eq!(support.ambiguous_peptides(), 1);
        assert_eq!(support.unique_peptides(), 3);

        let strong = support.freeze(2);
        assert!(!strong.contains("A"));
        assert!(strong.contains("B"));
    }

    #[test]
    fn test_batch_local_ambiguity_proposes_nothing() {
        let mut support = ProteinSupport::new();
        support.observe_batch([("p1", "A")]);
        support.observe_batch([("p1", "A"), ("p1", "B"), ("p2", "C"), ("p2", "C")]);

        assert_eq!(support.protein_of("p1"), Some("A"));
        assert_eq!(support.protein_of("p2"), Some("C"));
        assert_eq!(support.ambiguous_peptides(), 0);
    }

    #[test]
    fn test_sorted_strong_proteins() {
        let strong: StrongProteins = ["B".to_string(), "A".to_string()].into_iter().collect();
        assert_eq!(strong.sorted(), vec!["A", "B"]);
    }
}
