use std::collections::{BTreeSet, HashMap};

use super::NormalizedFeature;
use crate::stats::median;

type GroupKey = (String, String);

fn group_key(row: &NormalizedFeature, multiplexed: bool) -> GroupKey {
    let record = &row.record;
    let second = if multiplexed {
        record.channel.map(|c| c.to_string()).unwrap_or_default()
    } else {
        record.fraction.clone()
    };
    (record.run.clone(), second)
}

/// Pass-1 state of run-median normalization.
///
/// Collects intensities per (run, channel) for multiplexed designs and per
/// (run, fraction) for label-free designs, across all samples.
#[derive(Debug, Clone, Default)]
pub struct RunMedianAccumulator {
    multiplexed: bool,
    groups: HashMap<GroupKey, Vec<f64>>,
}

impl RunMedianAccumulator {
    /// Create an accumulator; `multiplexed` selects channel grouping
    pub fn new(multiplexed: bool) -> Self {
        Self {
            multiplexed,
            groups: HashMap::new(),
        }
    }

    /// Fold one sample's rows
    pub fn observe(&mut self, rows: &[NormalizedFeature]) {
        for row in rows {
            if let Some(value) = row.norm_intensity.filter(|v| !v.is_nan()) {
                self.groups
                    .entry(group_key(row, self.multiplexed))
                    .or_default()
                    .push(value);
            }
        }
    }

    /// Number of groups seen
    pub fn groups(&self) -> usize {
        self.groups.len()
    }

    /// Compute group medians and baselines
    pub fn freeze(self) -> RunMedianNormalizer {
        let mut baseline = None;
        let mut fraction_medians = HashMap::new();

        if self.multiplexed {
            // baseline over distinct values
            let distinct: BTreeSet<u64> = self
                .groups
                .values()
                .flatten()
                .map(|v| v.to_bits())
                .collect();
            let distinct: Vec<f64> = distinct.into_iter().map(f64::from_bits).collect();
            baseline = median(&distinct);
        } else {
            let mut by_fraction: HashMap<&str, Vec<f64>> = HashMap::new();
            for ((_, fraction), values) in &self.groups {
                by_fraction
                    .entry(fraction.as_str())
                    .or_default()
                    .extend_from_slice(values);
            }
            for (fraction, values) in by_fraction {
                if let Some(m) = median(&values) {
                    fraction_medians.insert(fraction.to_string(), m);
                }
            }
        }

        let group_medians = self
            .groups
            .iter()
            .filter_map(|(key, values)| median(values).map(|m| (key.clone(), m)))
            .collect();

        RunMedianNormalizer {
            multiplexed: self.multiplexed,
            group_medians,
            baseline,
            fraction_medians,
        }
    }
}

/// Frozen run-median normalization state
#[derive(Debug, Clone, Default)]
pub struct RunMedianNormalizer {
    multiplexed: bool,
    group_medians: HashMap<GroupKey, f64>,
    baseline: Option<f64>,
    fraction_medians: HashMap<String, f64>,
}

impl RunMedianNormalizer {
    /// Global baseline of multiplexed designs
    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Median of a (run, channel-or-fraction) group
    pub fn group_median(&self, run: &str, key: &str) -> Option<f64> {
        self.group_medians
            .get(&(run.to_string(), key.to_string()))
            .copied()
    }

    /// `value - group median + baseline`, `None` for unknown groups
    pub fn normalize(&self, row: &NormalizedFeature) -> Option<f64> {
        let value = row.norm_intensity?;
        let group = self.group_medians.get(&group_key(row, self.multiplexed))?;
        let anchor = if self.multiplexed {
            self.baseline?
        } else {
            *self.fraction_medians.get(&row.record.fraction)?
        };
        Some(value - group + anchor)
    }

    /// Normalize one sample's rows in place
    pub fn apply(&self, rows: &mut [NormalizedFeature]) {
        for row in rows.iter_mut() {
            row.norm_intensity = self.normalize(row);
        }
    }
}
