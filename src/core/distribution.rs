//! Parameter distributions and the sampler
//!
//! A [`ParameterDistribution`] names one valuation input and the probability
//! distribution it is drawn from. The wire format is a string-keyed
//! [`DistributionSpec`]; it is checked once on conversion, so every
//! `ParameterDistribution` that exists can be sampled.

use std::collections::BTreeMap;

use rand::distr::Uniform;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, LogNormal, Normal, Triangular};
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigurationError;

/// Distribution specification as it appears in request files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    /// Valuation parameter this distribution drives
    pub name: String,

    /// One of normal, uniform, triangular, lognormal, fixed (any case)
    pub distribution_type: String,

    /// Shape parameters; required keys depend on the type
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

/// Distribution family with its own parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributionKind {
    /// Gaussian with `mean` and `std`
    Normal { mean: f64, std: f64 },
    /// Flat over `[min, max)`
    Uniform { min: f64, max: f64 },
    /// Triangular with `min <= mode <= max`
    Triangular { min: f64, mode: f64, max: f64 },
    /// Log-normal; `mean` and `sigma` belong to the underlying normal
    LogNormal { mean: f64, sigma: f64 },
    /// Constant `value`
    Fixed { value: f64 },
}

/// Distribution family tag, parsed case-insensitively from `distribution_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionType {
    Normal,
    Uniform,
    Triangular,
    LogNormal,
    Fixed,
}

impl DistributionType {
    pub const ALL: [DistributionType; 5] = [
        DistributionType::Normal,
        DistributionType::Uniform,
        DistributionType::Triangular,
        DistributionType::LogNormal,
        DistributionType::Fixed,
    ];

    /// Canonical lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            DistributionType::Normal => "normal",
            DistributionType::Uniform => "uniform",
            DistributionType::Triangular => "triangular",
            DistributionType::LogNormal => "lognormal",
            DistributionType::Fixed => "fixed",
        }
    }

    /// Keys a spec of this type must carry
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            DistributionType::Normal => &["mean", "std"],
            DistributionType::Uniform => &["min", "max"],
            DistributionType::Triangular => &["min", "mode", "max"],
            DistributionType::LogNormal => &["mean", "sigma"],
            DistributionType::Fixed => &["value"],
        }
    }

    /// Match a type name in any case
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl std::fmt::Display for DistributionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl DistributionKind {
    pub fn distribution_type(&self) -> DistributionType {
        match self {
            DistributionKind::Normal { .. } => DistributionType::Normal,
            DistributionKind::Uniform { .. } => DistributionType::Uniform,
            DistributionKind::Triangular { .. } => DistributionType::Triangular,
            DistributionKind::LogNormal { .. } => DistributionType::LogNormal,
            DistributionKind::Fixed { .. } => DistributionType::Fixed,
        }
    }

    /// Canonical lowercase type name
    pub fn type_name(&self) -> &'static str {
        self.distribution_type().name()
    }

    /// Build a kind from a type name and string-keyed params
    pub fn from_params(
        name: &str,
        type_name: &str,
        params: &BTreeMap<String, f64>,
    ) -> Result<Self, ConfigurationError> {
        let tag = DistributionType::parse(type_name).ok_or_else(|| {
            ConfigurationError::UnknownDistribution {
                name: name.to_string(),
                kind: type_name.to_string(),
            }
        })?;
        let keys = tag.required_keys();

        if let Some(extra) = params.keys().find(|k| !keys.contains(&k.as_str())) {
            return Err(ConfigurationError::UnexpectedParam {
                name: name.to_string(),
                kind: tag.name(),
                key: extra.clone(),
            });
        }

        let get = |key: &'static str| {
            params
                .get(key)
                .copied()
                .ok_or_else(|| ConfigurationError::MissingParam {
                    name: name.to_string(),
                    kind: tag.name(),
                    key,
                })
        };

        let kind = match tag {
            DistributionType::Normal => DistributionKind::Normal {
                mean: get("mean")?,
                std: get("std")?,
            },
            DistributionType::Uniform => DistributionKind::Uniform {
                min: get("min")?,
                max: get("max")?,
            },
            DistributionType::Triangular => DistributionKind::Triangular {
                min: get("min")?,
                mode: get("mode")?,
                max: get("max")?,
            },
            DistributionType::LogNormal => DistributionKind::LogNormal {
                mean: get("mean")?,
                sigma: get("sigma")?,
            },
            DistributionType::Fixed => DistributionKind::Fixed {
                value: get("value")?,
            },
        };
        Ok(kind)
    }

    /// String-keyed params, the inverse of [`DistributionKind::from_params`]
    pub fn params(&self) -> BTreeMap<String, f64> {
        let pairs: Vec<(&str, f64)> = match *self {
            DistributionKind::Normal { mean, std } => vec![("mean", mean), ("std", std)],
            DistributionKind::Uniform { min, max } => vec![("min", min), ("max", max)],
            DistributionKind::Triangular { min, mode, max } => {
                vec![("min", min), ("mode", mode), ("max", max)]
            }
            DistributionKind::LogNormal { mean, sigma } => vec![("mean", mean), ("sigma", sigma)],
            DistributionKind::Fixed { value } => vec![("value", value)],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Check the ordering and sign constraints of each family
    pub fn validate(&self, name: &str) -> Result<(), ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidParam {
            name: name.to_string(),
            reason,
        };

        if let Some((key, value)) = self.params().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("'{}' must be finite, got {}", key, value)));
        }

        match *self {
            DistributionKind::Normal { std, .. } if std < 0.0 => {
                Err(invalid(format!("std must be >= 0, got {}", std)))
            }
            DistributionKind::Uniform { min, max } if min > max => Err(invalid(format!(
                "uniform requires min <= max, got min={} max={}",
                min, max
            ))),
            DistributionKind::Triangular { min, mode, max } if !(min <= mode && mode <= max) => {
                Err(invalid(format!(
                    "triangular requires min <= mode <= max, got min={} mode={} max={}",
                    min, mode, max
                )))
            }
            DistributionKind::LogNormal { sigma, .. } if sigma < 0.0 => {
                Err(invalid(format!("sigma must be >= 0, got {}", sigma)))
            }
            _ => Ok(()),
        }
    }
}

/// A named valuation parameter and the distribution it is sampled from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DistributionSpec", into = "DistributionSpec")]
pub struct ParameterDistribution {
    name: String,
    kind: DistributionKind,
}

impl ParameterDistribution {
    /// Create a validated distribution
    pub fn new(
        name: impl Into<String>,
        kind: DistributionKind,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        kind.validate(&name)?;
        Ok(Self { name, kind })
    }

    pub fn normal(
        name: impl Into<String>,
        mean: f64,
        std: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, DistributionKind::Normal { mean, std })
    }

    pub fn uniform(
        name: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, DistributionKind::Uniform { min, max })
    }

    pub fn triangular(
        name: impl Into<String>,
        min: f64,
        mode: f64,
        max: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, DistributionKind::Triangular { min, mode, max })
    }

    pub fn lognormal(
        name: impl Into<String>,
        mean: f64,
        sigma: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, DistributionKind::LogNormal { mean, sigma })
    }

    pub fn fixed(name: impl Into<String>, value: f64) -> Result<Self, ConfigurationError> {
        Self::new(name, DistributionKind::Fixed { value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &DistributionKind {
        &self.kind
    }

    /// Draw `n_samples` values; a seed makes the batch reproducible
    pub fn sample(
        &self,
        n_samples: usize,
        seed: Option<u64>,
    ) -> Result<Vec<f64>, ConfigurationError> {
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        self.sample_with(&mut rng, n_samples)
    }

    /// Draw `n_samples` values from a caller-owned generator
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        n_samples: usize,
    ) -> Result<Vec<f64>, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidParam {
            name: self.name.clone(),
            reason,
        };

        let values = match self.kind {
            DistributionKind::Fixed { value } => vec![value; n_samples],
            DistributionKind::Uniform { min, max } if min == max => vec![min; n_samples],
            DistributionKind::Triangular { min, max, .. } if min == max => vec![min; n_samples],
            DistributionKind::Normal { mean, std } => {
                let dist = Normal::new(mean, std).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, rng, n_samples)
            }
            DistributionKind::Uniform { min, max } => {
                let dist = Uniform::new(min, max).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, rng, n_samples)
            }
            DistributionKind::Triangular { min, mode, max } => {
                let dist = Triangular::new(min, max, mode).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, rng, n_samples)
            }
            DistributionKind::LogNormal { mean, sigma } => {
                let dist = LogNormal::new(mean, sigma).map_err(|e| invalid(e.to_string()))?;
                draw(&dist, rng, n_samples)
            }
        };
        Ok(values)
    }
}

fn draw<D, R>(dist: &D, rng: &mut R, n: usize) -> Vec<f64>
where
    D: Distribution<f64>,
    R: Rng + ?Sized,
{
    (0..n).map(|_| dist.sample(rng)).collect()
}

impl TryFrom<DistributionSpec> for ParameterDistribution {
    type Error = ConfigurationError;

    fn try_from(spec: DistributionSpec) -> Result<Self, Self::Error> {
        let kind =
            DistributionKind::from_params(&spec.name, &spec.distribution_type, &spec.params)?;
        Self::new(spec.name, kind)
    }
}

impl From<ParameterDistribution> for DistributionSpec {
    fn from(dist: ParameterDistribution) -> Self {
        DistributionSpec {
            distribution_type: dist.kind.type_name().to_string(),
            params: dist.kind.params(),
            name: dist.name,
        }
    }
}

/// Sample a distribution; see [`ParameterDistribution::sample`]
pub fn sample(
    distribution: &ParameterDistribution,
    n_samples: usize,
    seed: Option<u64>,
) -> Result<Vec<f64>, ConfigurationError> {
    distribution.sample(n_samples, seed)
}
