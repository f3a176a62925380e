//! # Peptidoform Rollup
//!
//! Three deterministic reductions over one sample's normalized rows:
//!
//! 1. [`select_best_peptidoforms`]: one row per (peptidoform, charge, sample,
//!    condition, biological replicate), the one with the highest normalized
//!    intensity or search-engine score. The first row holding the maximum wins.
//! 2. [`sum_replicates`]: sum per (protein, canonical peptide, sample,
//!    biological replicate, condition).
//! 3. [`median_conditions`]: median per (canonical peptide, sample, condition),
//!    with one output row per protein seen for that key.
//!
//! Groups are emitted in order of first appearance. Sums and medians sort
//! their inputs first, so stages 2 and 3 do not depend on row order.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedFeature;
use crate::stats::median;

/// Criterion of best-peptidoform selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeptidoformSelection {
    /// Highest normalized intensity
    #[default]
    Intensity,
    /// Highest search-engine score
    Score,
}

impl fmt::Display for PeptidoformSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeptidoformSelection::Intensity => write!(f, "intensity"),
            PeptidoformSelection::Score => write!(f, "score"),
        }
    }
}

impl FromStr for PeptidoformSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "intensity" => Ok(PeptidoformSelection::Intensity),
            "score" => Ok(PeptidoformSelection::Score),
            other => Err(format!("unknown peptidoform selection '{}'", other)),
        }
    }
}

/// Stage-2 row: summed intensity of a canonical peptide in one replicate
#[derive(Debug, Clone, PartialEq)]
pub struct SummedPeptide {
    /// Protein name
    pub protein: String,
    /// Canonical peptide
    pub canonical: String,
    /// Sample
    pub sample: String,
    /// Biological replicate
    pub bio_replicate: String,
    /// Condition
    pub condition: String,
    /// Summed normalized intensity
    pub intensity: f64,
}

/// Final peptide intensity row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideIntensity {
    /// Canonical peptide
    #[serde(rename = "PeptideCanonical")]
    pub canonical: String,
    /// Protein name
    #[serde(rename = "ProteinName")]
    pub protein: String,
    /// Sample
    #[serde(rename = "SampleID")]
    pub sample: String,
    /// Normalized intensity
    #[serde(rename = "NormIntensity")]
    pub norm_intensity: f64,
    /// Condition
    #[serde(rename = "Condition")]
    pub condition: String,
}

/// Group items by key, keeping groups in order of first appearance
fn group_in_order<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<(K, Vec<T>)>
where
    K: Hash + Eq + Clone,
    F: Fn(&T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }
    groups
}

fn sorted_sum(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    values.iter().sum()
}

/// Keep the best row of every peptidoform key; rows without a value are dropped first
pub fn select_best_peptidoforms(
    rows: Vec<NormalizedFeature>,
    selection: PeptidoformSelection,
) -> Vec<NormalizedFeature> {
    let rows = rows.into_iter().filter(|r| r.norm_intensity.is_some());
    let groups = group_in_order(rows, |r| {
        let rec = &r.record;
        (
            rec.peptidoform.clone(),
            rec.charge,
            rec.sample.clone(),
            rec.condition.clone(),
            rec.bio_replicate.clone(),
        )
    });

    groups
        .into_iter()
        .filter_map(|(_, group)| {
            let mut best: Option<NormalizedFeature> = None;
            for row in group {
                let better = match &best {
                    None => true,
                    Some(current) => match selection {
                        PeptidoformSelection::Intensity => row.norm_intensity > current.norm_intensity,
                        PeptidoformSelection::Score => row.record.score > current.record.score,
                    },
                };
                if better {
                    best = Some(row);
                }
            }
            best
        })
        .collect()
}

/// Sum normalized intensities per (protein, canonical, sample, replicate, condition)
pub fn sum_replicates(rows: &[NormalizedFeature]) -> Vec<SummedPeptide> {
    let valued = rows
        .iter()
        .filter_map(|r| r.norm_intensity.map(|v| (&r.record, v)));
    let groups = group_in_order(valued, |(rec, _)| {
        (
            rec.protein.as_str(),
            rec.canonical.as_str(),
            rec.sample.as_str(),
            rec.bio_replicate.as_str(),
            rec.condition.as_str(),
        )
    });

    groups
        .into_iter()
        .map(|((protein, canonical, sample, bio_replicate, condition), group)| {
            let mut values: Vec<f64> = group.iter().map(|(_, v)| *v).collect();
            SummedPeptide {
                protein: protein.to_string(),
                canonical: canonical.to_string(),
                sample: sample.to_string(),
                bio_replicate: bio_replicate.to_string(),
                condition: condition.to_string(),
                intensity: sorted_sum(&mut values),
            }
        })
        .collect()
}

/// Median per (canonical, sample, condition), one row per protein of the group
pub fn median_conditions(rows: &[SummedPeptide]) -> Vec<PeptideIntensity> {
    let groups = group_in_order(rows.iter(), |r| {
        (r.canonical.as_str(), r.sample.as_str(), r.condition.as_str())
    });

    let mut out = Vec::new();
    for ((canonical, sample, condition), group) in groups {
        let values: Vec<f64> = group.iter().map(|r| r.intensity).collect();
        let Some(value) = median(&values).filter(|v| !v.is_nan()) else {
            continue;
        };
        let mut proteins: Vec<&str> = Vec::new();
        for r in &group {
            if !proteins.contains(&r.protein.as_str()) {
                proteins.push(&r.protein);
            }
        }
        out.extend(proteins.into_iter().map(|protein| PeptideIntensity {
            canonical: canonical.to_string(),
            protein: protein.to_string(),
            sample: sample.to_string(),
            norm_intensity: value,
            condition: condition.to_string(),
        }));
    }
    out
}

/// All three stages over one sample's normalized rows
pub fn rollup(rows: Vec<NormalizedFeature>, selection: PeptidoformSelection) -> Vec<PeptideIntensity> {
    let best = select_best_peptidoforms(rows, selection);
    let summed = sum_replicates(&best);
    median_conditions(&summed)
}
