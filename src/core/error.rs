//! Error types for the simulation core
//!
//! Configuration problems are fatal to the call that hit them. Trial failures
//! are absorbed by the driver and only ever counted.

use miette::Diagnostic;
use thiserror::Error;

/// A malformed or incomplete simulation configuration
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("Unknown distribution type '{kind}' for parameter '{name}'")]
    #[diagnostic(
        code(valuekit::config::unknown_distribution),
        help("expected one of: normal, uniform, triangular, lognormal, fixed")
    )]
    UnknownDistribution { name: String, kind: String },

    #[error("Parameter '{name}': {kind} distribution requires '{key}'")]
    #[diagnostic(code(valuekit::config::missing_param))]
    MissingParam {
        name: String,
        kind: &'static str,
        key: &'static str,
    },

    #[error("Parameter '{name}': {kind} distribution does not take '{key}'")]
    #[diagnostic(code(valuekit::config::unexpected_param))]
    UnexpectedParam {
        name: String,
        kind: &'static str,
        key: String,
    },

    #[error("Parameter '{name}': {reason}")]
    #[diagnostic(code(valuekit::config::invalid_param))]
    InvalidParam { name: String, reason: String },

    #[error("Parameter '{name}' has more than one distribution")]
    #[diagnostic(
        code(valuekit::config::duplicate_parameter),
        help("list each varied parameter once")
    )]
    DuplicateParameter { name: String },

    #[error("Sample count must be positive")]
    #[diagnostic(code(valuekit::config::no_samples))]
    NoSamples,

    #[error("Percentile level {0} is outside 0..=100")]
    #[diagnostic(code(valuekit::config::percentile_level))]
    PercentileLevel(f64),

    #[error("Unknown valuation method '{0}'")]
    #[diagnostic(
        code(valuekit::config::unknown_method),
        help("run `valuekit methods` to list the available methods")
    )]
    UnknownMethod(String),
}

/// Why a single trial produced no output
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrialError {
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("valuation produced a non-finite value ({0})")]
    NonFinite(f64),
}
