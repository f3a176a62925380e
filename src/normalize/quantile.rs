use std::collections::HashMap;

use super::NormalizedFeature;

/// Pass-1 state of streaming quantile normalization.
///
/// Rank `i` holds the running mean of the `i`-th largest value of every
/// sample long enough to have one. The update is the incremental mean
/// `(avg * n + x) / (n + 1)`, so the result depends on sample order only
/// through floating-point rounding.
#[derive(Debug, Clone, Default)]
pub struct QuantileAccumulator {
    ranks: Vec<(f64, u64)>,
}

impl QuantileAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample's values (NaN values are ignored)
    pub fn observe<I: IntoIterator<Item = f64>>(&mut self, values: I) {
        let mut values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        values.sort_unstable_by(|a, b| b.total_cmp(a));

        for (rank, value) in values.into_iter().enumerate() {
            match self.ranks.get_mut(rank) {
                Some((average, count)) => {
                    let n = *count as f64;
                    *average = (*average * n + value) / (n + 1.0);
                    *count += 1;
                }
                None => self.ranks.push((value, 1)),
            }
        }
    }

    /// Current length of the reference distribution
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether no value was folded yet
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Freeze into the per-rank reference
    pub fn freeze(self) -> QuantileReference {
        QuantileReference {
            averages: self.ranks.into_iter().map(|(average, _)| average).collect(),
        }
    }
}

/// Frozen reference distribution, largest rank first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuantileReference {
    averages: Vec<f64>,
}

impl QuantileReference {
    /// Per-rank reference values
    pub fn averages(&self) -> &[f64] {
        &self.averages
    }

    /// Map of one sample's distinct values to reference values.
    ///
    /// Distinct values are ranked in descending order; tied values share a
    /// rank. Ranks beyond the reference length are left out.
    pub fn sample_mapping<I: IntoIterator<Item = f64>>(&self, values: I) -> HashMap<u64, f64> {
        let mut distinct: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        distinct.sort_unstable_by(|a, b| b.total_cmp(a));
        distinct.dedup();

        distinct
            .into_iter()
            .zip(self.averages.iter())
            .map(|(value, reference)| (value.to_bits(), *reference))
            .collect()
    }

    /// Replace each row's value with its reference value
    pub fn apply(&self, rows: &mut [NormalizedFeature]) {
        let mapping = self.sample_mapping(rows.iter().filter_map(|r| r.norm_intensity));
        for row in rows.iter_mut() {
            row.norm_intensity = row
                .norm_intensity
                .and_then(|value| mapping.get(&value.to_bits()).copied());
        }
    }
}
