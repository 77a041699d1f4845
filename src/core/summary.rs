//! Result summarizer - statistics, percentiles and histogram buckets
//!
//! Empty input never panics and never reads as zero: every statistic is NaN
//! so an all-failed simulation cannot pass for a real valuation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::error::ConfigurationError;

/// Percentile levels reported when none are requested
pub const DEFAULT_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

/// Summary of one Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloResult {
    /// Successful trial outputs, in trial order
    pub values: Vec<f64>,

    /// Percentile label (`p10`, `p2.5`, ...) to value
    pub percentiles: BTreeMap<String, f64>,

    pub mean: f64,

    /// Sample standard deviation (N-1 denominator)
    pub std: f64,

    pub min: f64,

    pub max: f64,

    /// Trials attempted
    pub n_samples: usize,

    /// Trials whose evaluation failed
    pub n_failed: usize,

    /// Base seed the run used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl MonteCarloResult {
    /// True when no trial produced a value
    pub fn is_undefined(&self) -> bool {
        self.values.is_empty()
    }

    pub fn n_succeeded(&self) -> usize {
        self.values.len()
    }

    pub fn percentile(&self, label: &str) -> Option<f64> {
        self.percentiles.get(label).copied()
    }
}

/// Label used for a percentile level: 10 -> `p10`, 2.5 -> `p2.5`
pub fn percentile_label(level: f64) -> String {
    format!("p{}", level)
}

/// Reject levels outside 0..=100
pub fn check_levels(levels: &[f64]) -> Result<(), ConfigurationError> {
    match levels.iter().find(|l| !(0.0..=100.0).contains(*l)) {
        Some(&bad) => Err(ConfigurationError::PercentileLevel(bad)),
        None => Ok(()),
    }
}

/// Percentile of sorted data by linear interpolation between order statistics
///
/// `level` is in percent. Returns NaN for empty input.
pub fn percentile(sorted: &[f64], level: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = (level / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let w = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * w
        }
    }
}

/// Mean and sample standard deviation; NaN where undefined
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n == 1 {
        return (mean, f64::NAN);
    }
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, variance.sqrt())
}

/// Reduce trial outputs to a [`MonteCarloResult`]
pub fn summarize(values: Vec<f64>, n_failed: usize, levels: &[f64]) -> MonteCarloResult {
    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let (mean, std) = mean_std(&values);
    let percentiles = levels
        .iter()
        .map(|&level| (percentile_label(level), percentile(&sorted, level)))
        .collect();

    MonteCarloResult {
        n_samples: values.len() + n_failed,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        max: sorted.last().copied().unwrap_or(f64::NAN),
        values,
        percentiles,
        mean,
        std,
        n_failed,
        seed: None,
    }
}

/// One histogram bucket; `upper` is exclusive except for the last bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

/// Equal-width buckets spanning `[min, max]`
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentiles_on_one_to_hundred() {
        let values: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let result = summarize(values, 0, &DEFAULT_PERCENTILES);

        let p10 = result.percentile("p10").unwrap();
        let p50 = result.percentile("p50").unwrap();
        let p90 = result.percentile("p90").unwrap();
        assert!((p50 - 50.5).abs() < 1e-12);
        assert!((p10 - 10.9).abs() < 1e-9);
        assert!((p90 - 90.1).abs() < 1e-9);
        assert!(p10 < p50 && p50 < p90);
        assert_eq!(result.min, 1.0);
        assert_eq!(result.max, 100.0);
    }

    #[test]
    fn test_interpolates_between_points() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
    }

    #[test]
    fn test_sample_standard_deviation() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        // population std is 2.0; sample std uses n-1
        assert!((std - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);

        let (mean, std) = mean_std(&[3.0]);
        assert_eq!(mean, 3.0);
        assert!(std.is_nan());
    }

    #[test]
    fn test_empty_outputs_are_undefined() {
        let result = summarize(Vec::new(), 12, &DEFAULT_PERCENTILES);
        assert!(result.is_undefined());
        assert!(result.mean.is_nan());
        assert!(result.std.is_nan());
        assert!(result.min.is_nan());
        assert_eq!(result.percentiles.len(), 5);
        assert!(result.percentiles.values().all(|v| v.is_nan()));
        assert_eq!(result.n_samples, 12);
    }

    #[test]
    fn test_summary_ignores_input_order() {
        let a = summarize(vec![5.0, 1.0, 3.0, 2.0, 4.0], 0, &DEFAULT_PERCENTILES);
        let b = summarize(vec![1.0, 2.0, 3.0, 4.0, 5.0], 0, &DEFAULT_PERCENTILES);
        assert_eq!(a.percentiles, b.percentiles);
        assert_eq!(a.mean, b.mean);
        assert_eq!(a.std, b.std);
    }

    #[test]
    fn test_custom_levels_and_labels() {
        assert_eq!(percentile_label(10.0), "p10");
        assert_eq!(percentile_label(2.5), "p2.5");
        assert!(check_levels(&[2.5, 97.5]).is_ok());
        assert_eq!(
            check_levels(&[50.0, 101.0]),
            Err(ConfigurationError::PercentileLevel(101.0))
        );
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert!(bins.iter().all(|b| b.count == 10));
        assert_eq!(bins[0].lower, 0.0);
        assert_eq!(bins[9].upper, 99.0);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_empty());
        let flat = histogram(&[4.0, 4.0, 4.0], 10);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 3);
    }
}
