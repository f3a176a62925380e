//! # Normalization Engine
//!
//! Per-sample intensity normalization in two passes over the sample buffers.
//!
//! Pass 1 feeds every sample's transformed intensities into a
//! [`NormalizationAccumulator`]. Freezing the accumulator yields a read-only
//! [`Normalizer`], which pass 2 applies to each sample in turn.
//!
//! ## Strategies
//!
//! - [`NormalizationMethod::Quantile`]: streaming quantile normalization
//!   against a per-rank reference distribution built with an incremental mean
//! - [`NormalizationMethod::RunMedian`]: centering on per-(run, channel) or
//!   per-(run, fraction) medians, re-anchored on a global baseline
//! - [`NormalizationMethod::None`]: the transformed intensity passes through
//!
//! ```rust
//! use pepnorm::normalize::QuantileAccumulator;
//!
//! let mut acc = QuantileAccumulator::new();
//! acc.observe([10.0, 8.0, 6.0]);
//! acc.observe([9.0, 7.0]);
//! let reference = acc.freeze();
//! assert_eq!(reference.averages(), &[9.5, 7.5, 6.0]);
//! ```

mod quantile;
mod run_median;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::design::LabelType;
use crate::feature::FeatureRecord;

pub use quantile::{QuantileAccumulator, QuantileReference};
pub use run_median::{RunMedianAccumulator, RunMedianNormalizer};

/// Normalization strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NormalizationMethod {
    /// Streaming quantile normalization
    #[default]
    Quantile,
    /// Run/channel median centering
    RunMedian,
    /// No normalization
    None,
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationMethod::Quantile => write!(f, "quantile"),
            NormalizationMethod::RunMedian => write!(f, "run-median"),
            NormalizationMethod::None => write!(f, "none"),
        }
    }
}

impl FromStr for NormalizationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quantile" | "qnorm" => Ok(NormalizationMethod::Quantile),
            "run-median" | "msstats" => Ok(NormalizationMethod::RunMedian),
            "none" | "skip" => Ok(NormalizationMethod::None),
            other => Err(format!(
                "unknown normalization method '{}' (expected quantile, run-median or none)",
                other
            )),
        }
    }
}

/// Intensity before normalization: zero becomes 1, then optional log2
#[inline]
pub fn transform_intensity(intensity: f64, log2: bool) -> f64 {
    let intensity = if intensity == 0.0 { 1.0 } else { intensity };
    if log2 {
        intensity.log2()
    } else {
        intensity
    }
}

/// A buffered feature with its working normalized intensity
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFeature {
    /// The ingested record
    pub record: FeatureRecord,
    /// Normalized intensity, `None` when it could not be derived
    pub norm_intensity: Option<f64>,
}

impl NormalizedFeature {
    /// Wrap a record with its transformed intensity
    pub fn new(record: FeatureRecord, log2: bool) -> Self {
        let norm_intensity = Some(transform_intensity(record.intensity, log2));
        Self {
            record,
            norm_intensity,
        }
    }
}

/// Pass-1 state of the selected strategy
#[derive(Debug, Clone)]
pub enum NormalizationAccumulator {
    /// Running per-rank means
    Quantile(QuantileAccumulator),
    /// Collected group intensities
    RunMedian(RunMedianAccumulator),
    /// Nothing to accumulate
    None,
}

impl NormalizationAccumulator {
    /// Create the accumulator of `method` for a design with `label`
    pub fn new(method: NormalizationMethod, label: LabelType) -> Self {
        match method {
            NormalizationMethod::Quantile => Self::Quantile(QuantileAccumulator::new()),
            NormalizationMethod::RunMedian => {
                Self::RunMedian(RunMedianAccumulator::new(label.is_multiplexed()))
            }
            NormalizationMethod::None => Self::None,
        }
    }

    /// Fold one sample's rows
    pub fn observe_sample(&mut self, rows: &[NormalizedFeature]) {
        match self {
            Self::Quantile(acc) => acc.observe(rows.iter().filter_map(|r| r.norm_intensity)),
            Self::RunMedian(acc) => acc.observe(rows),
            Self::None => {}
        }
    }

    /// Finish pass 1
    pub fn freeze(self) -> Normalizer {
        match self {
            Self::Quantile(acc) => Normalizer::Quantile(acc.freeze()),
            Self::RunMedian(acc) => Normalizer::RunMedian(acc.freeze()),
            Self::None => Normalizer::None,
        }
    }
}

/// Frozen, read-only normalization state
#[derive(Debug, Clone)]
pub enum Normalizer {
    /// Quantile reference distribution
    Quantile(QuantileReference),
    /// Group medians and baselines
    RunMedian(RunMedianNormalizer),
    /// Pass-through
    None,
}

impl Normalizer {
    /// Normalize one sample's rows in place.
    ///
    /// Rows whose value cannot be normalized get `None`.
    pub fn apply(&self, rows: &mut [NormalizedFeature]) {
        match self {
            Self::Quantile(reference) => reference.apply(rows),
            Self::RunMedian(normalizer) => normalizer.apply(rows),
            Self::None => {}
        }
    }

    /// Per-rank reference averages of the quantile strategy
    pub fn quantile_reference(&self) -> Option<&[f64]> {
        match self {
            Self::Quantile(reference) => Some(reference.averages()),
            _ => None,
        }
    }
}
