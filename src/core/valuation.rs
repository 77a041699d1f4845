//! Built-in valuation methods
//!
//! Each method is a pure function of named parameters. The Monte Carlo layer
//! only sees them through [`ValuationFn`]; they exist so request files and the
//! CLI can pick a function by name.

use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::driver::ValuationFn;
use crate::core::error::{ConfigurationError, TrialError};
use crate::core::matrix::Trial;

/// Longest explicit forecast the DCF method accepts; each year is one discounting step
pub const MAX_DCF_YEARS: f64 = 200.0;

/// Valuation methods selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ValuationMethod {
    /// Revenue times a market multiple
    RevenueMultiple,
    /// Discounted cash flow with a Gordon-growth terminal value
    Dcf,
    /// Venture capital method: discounted exit value less the new investment
    VcMethod,
}

impl ValuationMethod {
    pub const ALL: [ValuationMethod; 3] = [
        ValuationMethod::RevenueMultiple,
        ValuationMethod::Dcf,
        ValuationMethod::VcMethod,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValuationMethod::RevenueMultiple => "revenue-multiple",
            ValuationMethod::Dcf => "dcf",
            ValuationMethod::VcMethod => "vc-method",
        }
    }

    /// Parameters every trial must provide
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            ValuationMethod::RevenueMultiple => &["revenue", "multiple"],
            ValuationMethod::Dcf => &[
                "cash_flow",
                "growth_rate",
                "discount_rate",
                "terminal_growth",
                "years",
            ],
            ValuationMethod::VcMethod => &["exit_value", "target_return", "years", "investment"],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ValuationMethod::RevenueMultiple => "revenue x multiple",
            ValuationMethod::Dcf => "discounted cash flows plus terminal value",
            ValuationMethod::VcMethod => "exit value / (1 + target_return)^years - investment",
        }
    }

    fn revenue_multiple(params: &Trial) -> Result<f64, TrialError> {
        let revenue = params.require("revenue")?;
        let multiple = params.require("multiple")?;
        if multiple < 0.0 {
            return Err(TrialError::InvalidInput(format!(
                "multiple must be >= 0, got {}",
                multiple
            )));
        }
        Ok(revenue * multiple)
    }

    fn dcf(params: &Trial) -> Result<f64, TrialError> {
        let cash_flow = params.require("cash_flow")?;
        let growth = params.require("growth_rate")?;
        let discount = params.require("discount_rate")?;
        let terminal_growth = params.require("terminal_growth")?;
        let years = params.require("years")?.round();

        if !(1.0..=MAX_DCF_YEARS).contains(&years) {
            return Err(TrialError::InvalidInput(format!(
                "years must be within 1..={}, got {}",
                MAX_DCF_YEARS, years
            )));
        }
        if discount <= terminal_growth {
            return Err(TrialError::InvalidInput(format!(
                "discount_rate ({}) must exceed terminal_growth ({})",
                discount, terminal_growth
            )));
        }
        if discount <= -1.0 {
            return Err(TrialError::InvalidInput(format!(
                "discount_rate must be > -1, got {}",
                discount
            )));
        }

        let years = years as i32;
        let mut value = 0.0;
        let mut flow = cash_flow;
        for t in 1..=years {
            flow *= 1.0 + growth;
            value += flow / (1.0 + discount).powi(t);
        }
        let terminal = flow * (1.0 + terminal_growth) / (discount - terminal_growth);
        Ok(value + terminal / (1.0 + discount).powi(years))
    }

    fn vc_method(params: &Trial) -> Result<f64, TrialError> {
        let exit_value = params.require("exit_value")?;
        let target_return = params.require("target_return")?;
        let years = params.require("years")?;
        let investment = params.require("investment")?;

        if target_return <= -1.0 {
            return Err(TrialError::InvalidInput(format!(
                "target_return must be > -1, got {}",
                target_return
            )));
        }
        let post_money = exit_value / (1.0 + target_return).powf(years);
        Ok(post_money - investment)
    }
}

impl ValuationFn for ValuationMethod {
    fn evaluate(&self, params: &Trial) -> Result<f64, TrialError> {
        match self {
            ValuationMethod::RevenueMultiple => Self::revenue_multiple(params),
            ValuationMethod::Dcf => Self::dcf(params),
            ValuationMethod::VcMethod => Self::vc_method(params),
        }
    }
}

impl std::fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ValuationMethod {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ConfigurationError::UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(pairs: &[(&str, f64)]) -> Trial {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_revenue_multiple() {
        let t = trial(&[("revenue", 1_500_000.0), ("multiple", 6.0)]);
        assert_eq!(ValuationMethod::RevenueMultiple.evaluate(&t), Ok(9_000_000.0));

        let bad = trial(&[("revenue", 1_500_000.0), ("multiple", -1.0)]);
        assert!(ValuationMethod::RevenueMultiple.evaluate(&bad).is_err());
    }

    #[test]
    fn test_dcf_single_year() {
        let t = trial(&[
            ("cash_flow", 100.0),
            ("growth_rate", 0.0),
            ("discount_rate", 0.10),
            ("terminal_growth", 0.0),
            ("years", 1.0),
        ]);
        // 100/1.1 + (100/0.1)/1.1 = 1100/1.1
        let value = ValuationMethod::Dcf.evaluate(&t).unwrap();
        assert!((value - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_dcf_rejects_terminal_growth_above_discount() {
        let t = trial(&[
            ("cash_flow", 100.0),
            ("growth_rate", 0.05),
            ("discount_rate", 0.03),
            ("terminal_growth", 0.04),
            ("years", 5.0),
        ]);
        assert!(matches!(
            ValuationMethod::Dcf.evaluate(&t),
            Err(TrialError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dcf_rejects_out_of_range_years() {
        let with_years = |years: f64| {
            trial(&[
                ("cash_flow", 100.0),
                ("growth_rate", 0.02),
                ("discount_rate", 0.10),
                ("terminal_growth", 0.01),
                ("years", years),
            ])
        };
        for years in [0.4, 3.0e8, f64::INFINITY, f64::NAN] {
            assert!(
                matches!(
                    ValuationMethod::Dcf.evaluate(&with_years(years)),
                    Err(TrialError::InvalidInput(_))
                ),
                "years = {}",
                years
            );
        }
        assert!(ValuationMethod::Dcf.evaluate(&with_years(MAX_DCF_YEARS)).is_ok());
    }

    #[test]
    fn test_vc_method() {
        let t = trial(&[
            ("exit_value", 100_000_000.0),
            ("target_return", 1.0),
            ("years", 3.0),
            ("investment", 2_500_000.0),
        ]);
        let value = ValuationMethod::VcMethod.evaluate(&t).unwrap();
        assert!((value - 10_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_parameter_fails_trial() {
        let t = trial(&[("revenue", 1.0)]);
        assert_eq!(
            ValuationMethod::RevenueMultiple.evaluate(&t),
            Err(TrialError::MissingParameter("multiple".to_string()))
        );
    }

    #[test]
    fn test_parse_method_names() {
        assert_eq!("dcf".parse::<ValuationMethod>(), Ok(ValuationMethod::Dcf));
        assert_eq!(
            "Revenue_Multiple".parse::<ValuationMethod>(),
            Ok(ValuationMethod::RevenueMultiple)
        );
        assert!("comparables".parse::<ValuationMethod>().is_err());
        for m in ValuationMethod::ALL {
            assert_eq!(m.name().parse::<ValuationMethod>(), Ok(m));
        }
    }
}
