//! Parameter matrix - one complete, callable parameter set per trial
//!
//! Varied parameters get a sampled column; every other nominal parameter is
//! repeated unchanged. Each sampled column draws from its own generator
//! seeded by [`derive_seed`], so one parameter's stream never depends on
//! which other parameters are varied or in what order they are listed.

use std::collections::{BTreeMap, HashSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::core::distribution::ParameterDistribution;
use crate::core::error::{ConfigurationError, TrialError};

/// One parameter assignment for a single valuation call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trial {
    params: BTreeMap<String, f64>,
}

impl Trial {
    pub fn new(params: BTreeMap<String, f64>) -> Self {
        Self { params }
    }

    /// Look up a parameter
    pub fn get(&self, name: &str) -> Option<f64> {
        self.params.get(name).copied()
    }

    /// Look up a parameter the valuation cannot run without
    pub fn require(&self, name: &str) -> Result<f64, TrialError> {
        self.get(name)
            .ok_or_else(|| TrialError::MissingParameter(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.params.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.params
    }
}

impl FromIterator<(String, f64)> for Trial {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

/// Derive a per-parameter seed from the run seed and the parameter name
///
/// SHA-256 over the little-endian seed bytes followed by the UTF-8 name;
/// the first 8 digest bytes, little-endian, form the sub-seed.
pub fn derive_seed(seed: u64, parameter: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(parameter.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Column-major table of trial inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterMatrix {
    columns: BTreeMap<String, Vec<f64>>,
    n_samples: usize,
}

impl ParameterMatrix {
    /// Build `n_samples` trials from nominal values and the distributions to vary
    ///
    /// A distribution for a parameter missing from `nominal` adds that column.
    pub fn build(
        nominal: &BTreeMap<String, f64>,
        distributions: &[ParameterDistribution],
        n_samples: usize,
        seed: u64,
    ) -> Result<Self, ConfigurationError> {
        if n_samples == 0 {
            return Err(ConfigurationError::NoSamples);
        }

        let mut seen = HashSet::new();
        for dist in distributions {
            if !seen.insert(dist.name()) {
                return Err(ConfigurationError::DuplicateParameter {
                    name: dist.name().to_string(),
                });
            }
        }

        let mut columns: BTreeMap<String, Vec<f64>> = nominal
            .iter()
            .filter(|(name, _)| !seen.contains(name.as_str()))
            .map(|(name, &value)| (name.clone(), vec![value; n_samples]))
            .collect();

        for dist in distributions {
            let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(seed, dist.name()));
            let column = dist.sample_with(&mut rng, n_samples)?;
            tracing::trace!(
                parameter = dist.name(),
                distribution = dist.kind().type_name(),
                "sampled column"
            );
            columns.insert(dist.name().to_string(), column);
        }

        Ok(Self { columns, n_samples })
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Parameter names in column order
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// All values of one parameter across trials
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Assemble the parameter set for trial `index`
    pub fn row(&self, index: usize) -> Option<Trial> {
        if index >= self.n_samples {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|(name, values)| (name.clone(), values[index]))
                .collect(),
        )
    }

    /// Every trial, in order
    pub fn trials(&self) -> Vec<Trial> {
        (0..self.n_samples).filter_map(|i| self.row(i)).collect()
    }
}
