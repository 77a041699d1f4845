//! Simulation request files
//!
//! A request names a valuation method, its nominal parameters and the
//! distributions to vary:
//!
//! ```yaml
//! method: revenue-multiple
//! nominal_params:
//!   revenue: 2000000
//!   multiple: 8
//! distributions:
//!   - name: multiple
//!     distribution_type: triangular
//!     params: { min: 5, mode: 8, max: 14 }
//! n_samples: 20000
//! seed: 42
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::distribution::ParameterDistribution;
use crate::core::monte_carlo::{default_n_samples, default_percentiles, MonteCarloConfig};
use crate::core::valuation::ValuationMethod;
use crate::yaml::{parse_yaml_file, YamlError};

/// Environment fallback for `--seed`; overrides the request file's seed
pub const SEED_ENV: &str = "VALUEKIT_SEED";

/// Everything needed to run one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Valuation method to simulate
    pub method: ValuationMethod,

    /// Base-case value of every parameter the method takes
    #[serde(default)]
    pub nominal_params: BTreeMap<String, f64>,

    /// Parameters to vary
    #[serde(default)]
    pub distributions: Vec<ParameterDistribution>,

    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,

    /// Base valuation for the negotiation range; defaults to the nominal valuation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_valuation: Option<f64>,
}

impl SimulationRequest {
    /// Load a request from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self, YamlError> {
        let request: Self = parse_yaml_file(path)?;
        tracing::debug!(
            path = %path.display(),
            method = %request.method,
            varied = request.distributions.len(),
            "loaded simulation request"
        );
        Ok(request)
    }

    /// Parameters the method needs that neither the nominal set nor a distribution provides
    pub fn missing_parameters(&self) -> Vec<&'static str> {
        self.method
            .parameters()
            .iter()
            .copied()
            .filter(|p| {
                !self.nominal_params.contains_key(*p)
                    && !self.distributions.iter().any(|d| d.name() == *p)
            })
            .collect()
    }

    /// Sampling configuration for this request
    pub fn monte_carlo_config(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            distributions: self.distributions.clone(),
            n_samples: self.n_samples,
            seed: self.seed,
            percentiles: self.percentiles.clone(),
            parallel: false,
        }
    }
}
