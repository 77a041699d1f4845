//! Core module - sampling, simulation and summary types

pub mod config;
pub mod distribution;
pub mod driver;
pub mod error;
pub mod matrix;
pub mod monte_carlo;
pub mod negotiation;
pub mod summary;
pub mod valuation;

pub use config::SimulationRequest;
pub use distribution::{
    sample, DistributionKind, DistributionSpec, DistributionType, ParameterDistribution,
};
pub use driver::{run, run_parallel, DriverOutput, ValuationFn};
pub use error::{ConfigurationError, TrialError};
pub use matrix::{derive_seed, ParameterMatrix, Trial};
pub use monte_carlo::{simulate, MonteCarlo, MonteCarloConfig, TrialRecord};
pub use negotiation::{calculate, NegotiationRange};
pub use summary::{histogram, summarize, HistogramBin, MonteCarloResult, DEFAULT_PERCENTILES};
pub use valuation::ValuationMethod;
