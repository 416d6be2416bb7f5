//! Block-jackknife standard errors for the thermodynamic observables.
//!
//! MCMC time series are serially correlated, so the naive standard error of
//! the mean underestimates the true uncertainty. Leaving out contiguous
//! blocks instead of single samples keeps most of the correlation inside
//! the retained data, which makes the replicate spread a faithful estimate
//! of the error of the full-series statistic.

use crate::observables::{Observables, SeriesMeans};
use crate::records::Sample;

/// Target number of jackknife blocks. Roughly 20 blocks balances samples
/// per block (correlation coverage) against degrees of freedom in the
/// replicate variance. Tunable per call; changing it changes the error
/// bars, so downstream comparisons should pin one value.
pub const DEFAULT_TARGET_BLOCKS: usize = 20;

/// Standard errors of the four observables. NaN when the series is too
/// short for any estimate (n ≤ 1).
#[derive(Debug, Clone, Copy)]
pub struct ErrorEstimates {
    pub energy: f64,
    pub magnetization: f64,
    pub heat_capacity: f64,
    pub susceptibility: f64,
}

impl ErrorEstimates {
    fn nan() -> Self {
        ErrorEstimates {
            energy: f64::NAN,
            magnetization: f64::NAN,
            heat_capacity: f64::NAN,
            susceptibility: f64::NAN,
        }
    }
}

/// Contiguous `(start, end)` block bounds covering `0..n`; the last block
/// may be shorter when `block_size` does not divide `n`.
fn block_bounds(n: usize, block_size: usize) -> Vec<(usize, usize)> {
    let mut blocks = Vec::with_capacity(n / block_size + 1);
    let mut i = 0;
    while i < n {
        let j = (i + block_size).min(n);
        blocks.push((i, j));
        i = j;
    }
    blocks
}

/// Jackknife standard error from leave-one-block-out replicates:
/// sqrt((g-1)/g · Σ (θ_k − θ̄)²).
fn jackknife_std(replicates: &[f64]) -> f64 {
    let g = replicates.len();
    if g <= 1 {
        return f64::NAN;
    }
    let mean = replicates.iter().sum::<f64>() / g as f64;
    let sum_sq: f64 = replicates.iter().map(|&x| (x - mean).powi(2)).sum();
    ((g - 1) as f64 / g as f64 * sum_sq).sqrt()
}

/// Bessel-corrected standard deviation divided by √n.
fn naive_std_error(values: &[f64]) -> f64 {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (var / n as f64).sqrt()
}

/// Estimate the standard error of each observable for one simulation's
/// series (already sorted by step).
///
/// With fewer than two blocks the estimator falls back to the naive
/// per-sample error, treating each sample as its own resampling unit.
/// On strongly autocorrelated series that fallback overstates the
/// independent-sample count; kept as-is so error bars stay reproducible
/// across runs rather than silently corrected.
pub fn block_jackknife_errors(
    samples: &[Sample],
    lattice_size: u32,
    temperature: f64,
    use_abs_magnetization: bool,
    target_blocks: usize,
) -> ErrorEstimates {
    let n = samples.len();
    if n <= 1 {
        return ErrorEstimates::nan();
    }

    let n_spins = (lattice_size as f64) * (lattice_size as f64);
    let t = temperature;
    let block_size = (n / target_blocks.max(1)).max(1);
    let blocks = block_bounds(n, block_size);

    if blocks.len() <= 1 {
        // Naive per-sample fallback: each sample is one resampling unit,
        // with the derived quantity evaluated sample-wise.
        let e: Vec<f64> = samples.iter().map(|s| s.energy / n_spins).collect();
        let m: Vec<f64> = samples
            .iter()
            .map(|s| {
                let m = if use_abs_magnetization {
                    s.magnetization.abs()
                } else {
                    s.magnetization
                };
                m / n_spins
            })
            .collect();
        let cv: Vec<f64> = samples
            .iter()
            .map(|s| (s.energy_squared - s.energy * s.energy) / (n_spins * t * t))
            .collect();
        let chi: Vec<f64> = samples
            .iter()
            .map(|s| (s.magnetization_squared - s.magnetization * s.magnetization) / (n_spins * t))
            .collect();
        return ErrorEstimates {
            energy: naive_std_error(&e),
            magnetization: naive_std_error(&m),
            heat_capacity: naive_std_error(&cv),
            susceptibility: naive_std_error(&chi),
        };
    }

    // Running totals over the full series; each leave-one-block-out mean is
    // the full sum minus the block sum over the reduced count.
    let mut sum_e = 0.0;
    let mut sum_m = 0.0;
    let mut sum_abs = 0.0;
    let mut sum_e2 = 0.0;
    let mut sum_m2 = 0.0;
    for s in samples {
        sum_e += s.energy;
        sum_m += s.magnetization;
        sum_abs += s.magnetization.abs();
        sum_e2 += s.energy_squared;
        sum_m2 += s.magnetization_squared;
    }

    let g = blocks.len();
    let mut jk_e = Vec::with_capacity(g);
    let mut jk_m = Vec::with_capacity(g);
    let mut jk_cv = Vec::with_capacity(g);
    let mut jk_chi = Vec::with_capacity(g);

    for &(a, b) in &blocks {
        let n_k = n - (b - a);

        let mut blk_e = 0.0;
        let mut blk_m = 0.0;
        let mut blk_abs = 0.0;
        let mut blk_e2 = 0.0;
        let mut blk_m2 = 0.0;
        for s in &samples[a..b] {
            blk_e += s.energy;
            blk_m += s.magnetization;
            blk_abs += s.magnetization.abs();
            blk_e2 += s.energy_squared;
            blk_m2 += s.magnetization_squared;
        }

        let means = SeriesMeans {
            energy: (sum_e - blk_e) / n_k as f64,
            magnetization: (sum_m - blk_m) / n_k as f64,
            abs_magnetization: (sum_abs - blk_abs) / n_k as f64,
            energy_squared: (sum_e2 - blk_e2) / n_k as f64,
            magnetization_squared: (sum_m2 - blk_m2) / n_k as f64,
        };
        let obs = Observables::from_means(&means, n_spins, t, use_abs_magnetization);

        jk_e.push(obs.energy_per_spin);
        jk_m.push(obs.magnetization_per_spin);
        jk_cv.push(obs.heat_capacity);
        jk_chi.push(obs.susceptibility);
    }

    ErrorEstimates {
        energy: jackknife_std(&jk_e),
        magnetization: jackknife_std(&jk_m),
        heat_capacity: jackknife_std(&jk_cv),
        susceptibility: jackknife_std(&jk_chi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_bounds_cover_range() {
        assert_eq!(block_bounds(10, 3), vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
        assert_eq!(block_bounds(4, 4), vec![(0, 4)]);
        assert_eq!(block_bounds(5, 1).len(), 5);
    }

    #[test]
    fn jackknife_std_of_identical_replicates_is_zero() {
        assert_eq!(jackknife_std(&[1.5, 1.5, 1.5, 1.5]), 0.0);
    }

    #[test]
    fn jackknife_std_needs_two_replicates() {
        assert!(jackknife_std(&[1.0]).is_nan());
    }
}
