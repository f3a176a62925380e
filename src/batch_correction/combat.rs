use log::{debug, warn};

use super::BatchCorrectionError;
use crate::stats::{mean, sample_variance};

const CONVERGENCE: f64 = 1e-4;
const MAX_ITERATIONS: usize = 1000;

/// A batch-effect correction routine.
///
/// `matrix` is features × samples; `batches` holds one dense batch code per
/// sample column. The result must have the shape of `matrix`.
pub trait BatchCorrector {
    /// Correct `matrix` for the batch assignment `batches`
    fn correct(
        &self,
        matrix: &[Vec<f64>],
        batches: &[usize],
    ) -> Result<Vec<Vec<f64>>, BatchCorrectionError>;
}

/// Check that `matrix` is rectangular with one batch code per column
pub fn check_shape(matrix: &[Vec<f64>], batches: &[usize]) -> Result<(), BatchCorrectionError> {
    if let Some((i, row)) = matrix
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != batches.len())
    {
        return Err(BatchCorrectionError::MalformedBatchCorrectionInput(format!(
            "row {} has {} columns but {} batch ids were given",
            i,
            row.len(),
            batches.len()
        )));
    }
    Ok(())
}

/// Parametric empirical-Bayes location/scale adjustment (ComBat).
///
/// Each feature is standardized with its pooled variance, per-batch location
/// and scale estimates are shrunk toward priors shared by all features, and
/// the data are rescaled with the shrunk estimates. Features with zero pooled
/// variance are left unchanged. When any batch has a single sample, only the
/// location is adjusted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmpiricalBayes {
    /// Adjust the location only
    pub mean_only: bool,
}

struct BatchPrior {
    gamma_bar: f64,
    tau2: f64,
    a: f64,
    b: f64,
}

impl EmpiricalBayes {
    /// Location and scale adjustment
    pub fn new() -> Self {
        Self::default()
    }

    /// Location-only adjustment
    pub fn mean_only() -> Self {
        Self { mean_only: true }
    }
}

fn gamma_posterior(gamma_hat: f64, n: f64, delta: f64, prior: &BatchPrior) -> f64 {
    let posterior = (prior.tau2 * n * gamma_hat + delta * prior.gamma_bar) / (prior.tau2 * n + delta);
    if posterior.is_finite() {
        posterior
    } else {
        gamma_hat
    }
}

fn delta_posterior(standardized: &[f64], gamma: f64, prior: &BatchPrior) -> Option<f64> {
    let n = standardized.len() as f64;
    let ss: f64 = standardized.iter().map(|x| (x - gamma).powi(2)).sum();
    let posterior = (0.5 * ss + prior.b) / (n / 2.0 + prior.a - 1.0);
    (posterior.is_finite() && posterior > 0.0).then_some(posterior)
}

/// Iterative joint solution of the location and scale posteriors of one feature
fn solve(standardized: &[f64], gamma_hat: f64, delta_hat: f64, prior: &BatchPrior) -> (f64, f64) {
    let n = standardized.len() as f64;
    let mut gamma = gamma_hat;
    let mut delta = delta_hat;
    for _ in 0..MAX_ITERATIONS {
        let gamma_new = gamma_posterior(gamma_hat, n, delta, prior);
        let Some(delta_new) = delta_posterior(standardized, gamma_new, prior) else {
            return (gamma_new, delta_hat);
        };
        let change = ((gamma_new - gamma) / gamma)
            .abs()
            .max(((delta_new - delta) / delta).abs());
        gamma = gamma_new;
        delta = delta_new;
        if change.is_nan() || change < CONVERGENCE {
            break;
        }
    }
    (gamma, delta)
}

/// Method-of-moments inverse-gamma hyperparameters
fn inverse_gamma_prior(deltas: &[f64]) -> Option<(f64, f64)> {
    let m = mean(deltas)?;
    let s2 = sample_variance(deltas)?;
    if s2.is_nan() || s2 <= 0.0 {
        return None;
    }
    Some(((2.0 * s2 + m * m) / s2, (m * s2 + m * m * m) / s2))
}

impl BatchCorrector for EmpiricalBayes {
    fn correct(
        &self,
        matrix: &[Vec<f64>],
        batches: &[usize],
    ) -> Result<Vec<Vec<f64>>, BatchCorrectionError> {
        check_shape(matrix, batches)?;
        let n_batches = batches.iter().max().map_or(0, |b| b + 1);
        let members: Vec<Vec<usize>> = (0..n_batches)
            .map(|b| (0..batches.len()).filter(|&j| batches[j] == b).collect())
            .collect();
        if members.iter().any(Vec::is_empty) {
            return Err(BatchCorrectionError::MalformedBatchCorrectionInput(
                "batch ids must be dense codes starting at 0".to_string(),
            ));
        }
        if n_batches < 2 {
            warn!("Fewer than two batches; nothing to correct");
            return Ok(matrix.to_vec());
        }
        let mean_only = self.mean_only || members.iter().any(|m| m.len() == 1);
        if mean_only && !self.mean_only {
            warn!("A batch has a single sample; adjusting location only");
        }

        let n = batches.len() as f64;
        let mut corrected = matrix.to_vec();

        // standardize features with non-zero pooled variance
        let mut features = Vec::new();
        let mut standardized = Vec::new();
        for (g, row) in matrix.iter().enumerate() {
            let grand_mean = row.iter().sum::<f64>() / n;
            let batch_means: Vec<f64> = members
                .iter()
                .map(|cols| cols.iter().map(|&j| row[j]).sum::<f64>() / cols.len() as f64)
                .collect();
            let pooled = row
                .iter()
                .zip(batches)
                .map(|(x, &b)| (x - batch_means[b]).powi(2))
                .sum::<f64>()
                / n;
            if pooled.is_nan() || pooled <= 0.0 {
                continue;
            }
            let sd = pooled.sqrt();
            features.push((g, grand_mean, sd));
            standardized.push(row.iter().map(|x| (x - grand_mean) / sd).collect::<Vec<f64>>());
        }
        debug!(
            "ComBat over {} of {} features, {} batches",
            features.len(),
            matrix.len(),
            n_batches
        );
        if features.is_empty() {
            return Ok(corrected);
        }

        for cols in &members {
            let values: Vec<Vec<f64>> = standardized
                .iter()
                .map(|row| cols.iter().map(|&j| row[j]).collect())
                .collect();
            let gamma_hat: Vec<f64> = values.iter().map(|v| mean(v).unwrap_or(0.0)).collect();
            let delta_hat: Vec<f64> = values
                .iter()
                .map(|v| sample_variance(v).unwrap_or(1.0))
                .collect();

            let gamma_bar = mean(&gamma_hat).unwrap_or(0.0);
            let tau2 = sample_variance(&gamma_hat).unwrap_or(0.0);
            let (a, b) = inverse_gamma_prior(&delta_hat).unwrap_or((f64::NAN, f64::NAN));
            let prior = BatchPrior {
                gamma_bar,
                tau2,
                a,
                b,
            };

            for (k, &(g, grand_mean, sd)) in features.iter().enumerate() {
                let (gamma, delta) = if mean_only {
                    (gamma_posterior(gamma_hat[k], cols.len() as f64, 1.0, &prior), 1.0)
                } else if a.is_nan() {
                    let gamma = gamma_posterior(gamma_hat[k], cols.len() as f64, delta_hat[k], &prior);
                    (gamma, delta_hat[k])
                } else {
                    solve(&values[k], gamma_hat[k], delta_hat[k], &prior)
                };
                let scale = if delta > 0.0 && delta.is_finite() { delta.sqrt() } else { 1.0 };
                for (&j, s) in cols.iter().zip(&values[k]) {
                    corrected[g][j] = (s - gamma) / scale * sd + grand_mean;
                }
            }
        }
        Ok(corrected)
    }
}
