//! Library-level tests of the Monte Carlo layer

use std::collections::BTreeMap;

use valuekit::core::summary::percentile;
use valuekit::{
    calculate, simulate, ConfigurationError, MonteCarloConfig, NegotiationRange,
    ParameterDistribution, Trial, TrialError, ValuationMethod,
};

fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn dcf_nominal() -> BTreeMap<String, f64> {
    params(&[
        ("cash_flow", 1_000_000.0),
        ("growth_rate", 0.08),
        ("discount_rate", 0.12),
        ("terminal_growth", 0.03),
        ("years", 5.0),
    ])
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_seeded_sampling_is_reproducible() {
    let dist = ParameterDistribution::lognormal("exit", 2.0, 0.4).unwrap();
    assert_eq!(dist.sample(500, Some(11)).unwrap(), dist.sample(500, Some(11)).unwrap());
    assert_ne!(dist.sample(500, Some(11)).unwrap(), dist.sample(500, Some(12)).unwrap());
}

#[test]
fn test_bounded_distributions_stay_in_range() {
    let uniform = ParameterDistribution::uniform("u", 3.0, 4.0).unwrap();
    assert!(uniform
        .sample(2_000, Some(1))
        .unwrap()
        .iter()
        .all(|&v| (3.0..=4.0).contains(&v)));

    let triangular = ParameterDistribution::triangular("t", -2.0, 0.0, 5.0).unwrap();
    assert!(triangular
        .sample(2_000, Some(2))
        .unwrap()
        .iter()
        .all(|&v| (-2.0..=5.0).contains(&v)));

    let lognormal = ParameterDistribution::lognormal("l", 0.0, 1.0).unwrap();
    assert!(lognormal.sample(2_000, Some(3)).unwrap().iter().all(|&v| v > 0.0));
}

#[test]
fn test_invalid_distributions_are_rejected() {
    assert!(ParameterDistribution::normal("x", 0.0, -1.0).is_err());
    assert!(ParameterDistribution::uniform("x", 2.0, 1.0).is_err());
    assert!(ParameterDistribution::triangular("x", 0.0, 5.0, 1.0).is_err());
    assert!(ParameterDistribution::lognormal("x", 0.0, f64::NAN).is_err());
}

// ============================================================================
// Simulation
// ============================================================================

#[test]
fn test_dcf_simulation_is_reproducible_and_ordered() {
    let config = MonteCarloConfig::new(
        vec![
            ParameterDistribution::normal("growth_rate", 0.08, 0.02).unwrap(),
            ParameterDistribution::uniform("discount_rate", 0.10, 0.15).unwrap(),
        ],
        5_000,
    )
    .with_seed(2024);

    let a = simulate(&ValuationMethod::Dcf, &dcf_nominal(), config.clone()).unwrap();
    let b = simulate(&ValuationMethod::Dcf, &dcf_nominal(), config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.n_failed, 0);
    assert_eq!(a.n_samples, 5_000);

    let p: Vec<f64> = ["p10", "p25", "p50", "p75", "p90"]
        .iter()
        .map(|l| a.percentile(l).unwrap())
        .collect();
    assert!(p.windows(2).all(|w| w[0] <= w[1]));
    assert!(a.min <= p[0] && p[4] <= a.max);
}

#[test]
fn test_unvaried_simulation_has_zero_spread() {
    let result = simulate(
        &ValuationMethod::RevenueMultiple,
        &params(&[("revenue", 500.0), ("multiple", 4.0)]),
        MonteCarloConfig::new(vec![], 100).with_seed(1),
    )
    .unwrap();
    assert_eq!(result.std, 0.0);
    assert!(result.percentiles.values().all(|&v| v == 2_000.0));
}

#[test]
fn test_failures_reduce_sample_count() {
    // discount rate dips below terminal growth on part of its range
    let config = MonteCarloConfig::new(
        vec![ParameterDistribution::uniform("discount_rate", 0.0, 0.1).unwrap()],
        1_000,
    )
    .with_seed(8);
    let result = simulate(&ValuationMethod::Dcf, &dcf_nominal(), config).unwrap();

    assert!(result.n_failed > 0);
    assert!(!result.is_undefined());
    assert_eq!(result.values.len() + result.n_failed, 1_000);
}

#[test]
fn test_missing_parameter_fails_every_trial() {
    let result = simulate(
        &ValuationMethod::RevenueMultiple,
        &params(&[("revenue", 500.0)]),
        MonteCarloConfig::new(vec![], 25),
    )
    .unwrap();
    assert!(result.is_undefined());
    assert_eq!(result.n_failed, 25);
    assert!(result.mean.is_nan());
    assert!(result.percentile("p50").unwrap().is_nan());
}

#[test]
fn test_closure_valuation() {
    let double = |t: &Trial| -> Result<f64, TrialError> { Ok(2.0 * t.require("x")?) };
    let config = MonteCarloConfig::new(
        vec![ParameterDistribution::fixed("x", 21.0).unwrap()],
        10,
    );
    let result = simulate(&double, &BTreeMap::new(), config).unwrap();
    assert_eq!(result.mean, 42.0);
}

#[test]
fn test_zero_samples_is_a_configuration_error() {
    let err = simulate(
        &ValuationMethod::RevenueMultiple,
        &params(&[("revenue", 1.0), ("multiple", 1.0)]),
        MonteCarloConfig::new(vec![], 0),
    )
    .unwrap_err();
    assert_eq!(err, ConfigurationError::NoSamples);
}

// ============================================================================
// Statistics and negotiation
// ============================================================================

#[test]
fn test_percentile_interpolates_linearly() {
    let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(percentile(&sorted, 50.0), 3.0);
    assert_eq!(percentile(&sorted, 25.0), 2.0);
    assert!((percentile(&sorted, 10.0) - 1.4).abs() < 1e-12);
    assert_eq!(percentile(&sorted, 100.0), 5.0);
    assert!(percentile(&[], 50.0).is_nan());
}

#[test]
fn test_negotiation_from_simulation() {
    let config = MonteCarloConfig::new(
        vec![ParameterDistribution::triangular("multiple", 5.0, 8.0, 14.0).unwrap()],
        4_000,
    )
    .with_seed(3);
    let nominal = params(&[("revenue", 1_000.0), ("multiple", 8.0)]);
    let result = simulate(&ValuationMethod::RevenueMultiple, &nominal, config).unwrap();

    let range = NegotiationRange::from_result(8_000.0, &result);
    assert_eq!(range.floor, result.percentile("p10").unwrap());
    assert_eq!(range.target, result.percentile("p50").unwrap());
    assert_eq!(range.ceiling, result.percentile("p90").unwrap());
    assert!(range.is_ordered());
}

#[test]
fn test_negotiation_fallback_without_percentiles() {
    let range = calculate(1_000.0, None);
    assert_eq!(range.floor, 700.0);
    assert_eq!(range.target, 1_000.0);
    assert_eq!(range.ceiling, 1_500.0);
}
