//! Negotiation range from a base valuation and optional simulation percentiles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::summary::MonteCarloResult;

/// Multipliers applied to the base valuation when no usable simulation data exists
pub const FALLBACK_MULTIPLIERS: NegotiationRange = NegotiationRange {
    floor: 0.70,
    conservative: 0.85,
    target: 1.00,
    aggressive: 1.20,
    ceiling: 1.50,
};

/// Percentile labels that must all be present to use simulation bounds
pub const REQUIRED_PERCENTILES: [&str; 4] = ["p10", "p25", "p75", "p90"];

/// Five negotiation positions, expected `floor < conservative <= target <= aggressive < ceiling`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NegotiationRange {
    pub floor: f64,
    pub conservative: f64,
    pub target: f64,
    pub aggressive: f64,
    pub ceiling: f64,
}

impl NegotiationRange {
    /// Derive a range; simulation bounds win when p10/p25/p75/p90 are all present
    ///
    /// The target is `p50` when present and the base valuation otherwise.
    /// Inputs are trusted as given.
    pub fn calculate(valuation: f64, percentiles: Option<&BTreeMap<String, f64>>) -> Self {
        match percentiles {
            Some(p) if REQUIRED_PERCENTILES.iter().all(|k| p.contains_key(*k)) => Self {
                floor: p["p10"],
                conservative: p["p25"],
                target: p.get("p50").copied().unwrap_or(valuation),
                aggressive: p["p75"],
                ceiling: p["p90"],
            },
            _ => FALLBACK_MULTIPLIERS.scaled(valuation),
        }
    }

    /// Range from a finished simulation; undefined results fall back to multipliers
    pub fn from_result(valuation: f64, result: &MonteCarloResult) -> Self {
        if result.is_undefined() {
            return Self::calculate(valuation, None);
        }
        Self::calculate(valuation, Some(&result.percentiles))
    }

    fn scaled(&self, valuation: f64) -> Self {
        Self {
            floor: valuation * self.floor,
            conservative: valuation * self.conservative,
            target: valuation * self.target,
            aggressive: valuation * self.aggressive,
            ceiling: valuation * self.ceiling,
        }
    }

    /// Whether the positions hold their expected ordering
    pub fn is_ordered(&self) -> bool {
        self.floor < self.conservative
            && self.conservative <= self.target
            && self.target <= self.aggressive
            && self.aggressive < self.ceiling
    }

    /// Positions as (label, value) pairs, low to high
    pub fn positions(&self) -> [(&'static str, f64); 5] {
        [
            ("floor", self.floor),
            ("conservative", self.conservative),
            ("target", self.target),
            ("aggressive", self.aggressive),
            ("ceiling", self.ceiling),
        ]
    }
}

/// See [`NegotiationRange::calculate`]
pub fn calculate(valuation: f64, percentiles: Option<&BTreeMap<String, f64>>) -> NegotiationRange {
    NegotiationRange::calculate(valuation, percentiles)
}
