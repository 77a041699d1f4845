//! valuekit: Monte Carlo valuation ranges for startup finance
//!
//! Wraps any deterministic valuation function, samples its inputs from
//! configurable distributions, and reduces the outcomes to percentiles and a
//! negotiation range.

pub mod cli;
pub mod core;
pub mod logging;
pub mod yaml;

pub use crate::core::{
    calculate, simulate, ConfigurationError, MonteCarlo, MonteCarloConfig, MonteCarloResult,
    NegotiationRange, ParameterDistribution, Trial, TrialError, ValuationFn, ValuationMethod,
};
