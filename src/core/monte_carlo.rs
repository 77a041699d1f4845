//! Monte Carlo orchestration
//!
//! Builds the parameter matrix, drives the valuation over every trial and
//! summarizes what came back. Knows nothing about which valuation it runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::distribution::ParameterDistribution;
use crate::core::driver::{self, ValuationFn};
use crate::core::error::ConfigurationError;
use crate::core::matrix::{ParameterMatrix, Trial};
use crate::core::summary::{self, MonteCarloResult, DEFAULT_PERCENTILES};

/// Inputs of one trial and its output, `None` when evaluation failed
#[derive(Debug, Clone, PartialEq)]
pub struct TrialRecord {
    pub inputs: Trial,
    pub output: Option<f64>,
}

/// How to sample and evaluate one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Parameters to vary; everything else stays nominal
    #[serde(default)]
    pub distributions: Vec<ParameterDistribution>,

    /// Trials to run
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Base seed; a random one is drawn and reported when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Percentile levels to report
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,

    /// Evaluate trials on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

pub fn default_n_samples() -> usize {
    10_000
}

pub fn default_percentiles() -> Vec<f64> {
    DEFAULT_PERCENTILES.to_vec()
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            distributions: Vec::new(),
            n_samples: default_n_samples(),
            seed: None,
            percentiles: default_percentiles(),
            parallel: false,
        }
    }
}

impl MonteCarloConfig {
    pub fn new(distributions: Vec<ParameterDistribution>, n_samples: usize) -> Self {
        Self {
            distributions,
            n_samples,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_percentiles(mut self, levels: Vec<f64>) -> Self {
        self.percentiles = levels;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// A configured simulation, reusable across valuations
#[derive(Debug, Clone)]
pub struct MonteCarlo {
    config: MonteCarloConfig,
}

impl MonteCarlo {
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Run the simulation and summarize it
    pub fn run<V: ValuationFn + ?Sized>(
        &self,
        valuation: &V,
        nominal: &BTreeMap<String, f64>,
    ) -> Result<MonteCarloResult, ConfigurationError> {
        self.run_with_trials(valuation, nominal)
            .map(|(result, _)| result)
    }

    /// Run the simulation, also returning every trial's inputs and output for export
    pub fn run_with_trials<V: ValuationFn + ?Sized>(
        &self,
        valuation: &V,
        nominal: &BTreeMap<String, f64>,
    ) -> Result<(MonteCarloResult, Vec<TrialRecord>), ConfigurationError> {
        summary::check_levels(&self.config.percentiles)?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        tracing::info!(
            n_samples = self.config.n_samples,
            varied = self.config.distributions.len(),
            seed,
            parallel = self.config.parallel,
            "starting simulation"
        );

        let matrix = ParameterMatrix::build(
            nominal,
            &self.config.distributions,
            self.config.n_samples,
            seed,
        )?;
        let trials = matrix.trials();

        let output = if self.config.parallel {
            driver::run_parallel(valuation, &trials)
        } else {
            driver::run(valuation, &trials)
        };

        let mut outputs = output.values.iter().copied();
        let mut failed = output.failed.iter().peekable();
        let records: Vec<TrialRecord> = trials
            .into_iter()
            .enumerate()
            .map(|(index, inputs)| {
                let output = if failed.next_if_eq(&&index).is_some() {
                    None
                } else {
                    outputs.next()
                };
                TrialRecord { inputs, output }
            })
            .collect();

        let mut result =
            summary::summarize(output.values, output.n_failed, &self.config.percentiles);
        result.seed = Some(seed);

        if result.is_undefined() {
            tracing::warn!(n_failed = result.n_failed, "every trial failed; result is undefined");
        } else {
            tracing::info!(
                succeeded = result.n_succeeded(),
                failed = result.n_failed,
                mean = result.mean,
                "simulation finished"
            );
        }
        Ok((result, records))
    }
}

/// One-shot convenience over [`MonteCarlo::run`]
pub fn simulate<V: ValuationFn + ?Sized>(
    valuation: &V,
    nominal: &BTreeMap<String, f64>,
    config: MonteCarloConfig,
) -> Result<MonteCarloResult, ConfigurationError> {
    MonteCarlo::new(config).run(valuation, nominal)
}
