//! Simulation driver - evaluate a valuation once per trial
//!
//! Each trial yields a `Result`; failures are counted and dropped, so one bad
//! parameter combination never aborts the batch.

use rayon::prelude::*;

use crate::core::error::TrialError;
use crate::core::matrix::Trial;

/// Anything that turns a complete parameter set into a valuation
///
/// Implementations report bad inputs as `Err`. They must not panic: the driver
/// does not catch unwinding, so a panic in one trial aborts the whole batch.
pub trait ValuationFn: Sync {
    fn evaluate(&self, params: &Trial) -> Result<f64, TrialError>;
}

impl<F> ValuationFn for F
where
    F: Fn(&Trial) -> Result<f64, TrialError> + Sync,
{
    fn evaluate(&self, params: &Trial) -> Result<f64, TrialError> {
        self(params)
    }
}

/// Outputs of the successful trials plus the failure count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverOutput {
    /// Successful outputs, in trial order
    pub values: Vec<f64>,
    pub n_failed: usize,
    /// Indices of the failed trials
    pub failed: Vec<usize>,
}

impl DriverOutput {
    fn collect(outcomes: Vec<Result<f64, TrialError>>) -> Self {
        let mut output = DriverOutput {
            values: Vec::with_capacity(outcomes.len()),
            ..Default::default()
        };
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(value) => output.values.push(value),
                Err(e) => {
                    tracing::debug!(trial = index, error = %e, "trial failed");
                    output.n_failed += 1;
                    output.failed.push(index);
                }
            }
        }
        if output.n_failed > 0 {
            tracing::warn!(
                failed = output.n_failed,
                succeeded = output.values.len(),
                "some trials produced no valuation"
            );
        }
        output
    }

    pub fn n_trials(&self) -> usize {
        self.values.len() + self.n_failed
    }
}

fn evaluate_trial<V: ValuationFn + ?Sized>(
    valuation: &V,
    trial: &Trial,
) -> Result<f64, TrialError> {
    let value = valuation.evaluate(trial)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TrialError::NonFinite(value))
    }
}

/// Evaluate every trial on the current thread
pub fn run<V: ValuationFn + ?Sized>(valuation: &V, trials: &[Trial]) -> DriverOutput {
    let outcomes = trials
        .iter()
        .map(|trial| evaluate_trial(valuation, trial))
        .collect();
    DriverOutput::collect(outcomes)
}

/// Evaluate trials on the rayon pool; output order matches [`run`]
pub fn run_parallel<V: ValuationFn + ?Sized>(valuation: &V, trials: &[Trial]) -> DriverOutput {
    let outcomes = trials
        .par_iter()
        .map(|trial| evaluate_trial(valuation, trial))
        .collect();
    DriverOutput::collect(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trials(xs: &[f64]) -> Vec<Trial> {
        xs.iter()
            .map(|&x| [("x".to_string(), x)].into_iter().collect())
            .collect()
    }

    fn sqrt_valuation(t: &Trial) -> Result<f64, TrialError> {
        let x = t.require("x")?;
        if x < 0.0 {
            return Err(TrialError::InvalidInput(format!("x = {}", x)));
        }
        Ok(x.sqrt())
    }

    #[test]
    fn test_failures_are_counted_not_propagated() {
        let out = run(&sqrt_valuation, &trials(&[4.0, -1.0, 9.0, -2.0]));
        assert_eq!(out.values, vec![2.0, 3.0]);
        assert_eq!(out.n_failed, 2);
        assert_eq!(out.failed, vec![1, 3]);
        assert_eq!(out.n_trials(), 4);
    }

    #[test]
    fn test_non_finite_output_counts_as_failure() {
        let reciprocal = |t: &Trial| -> Result<f64, TrialError> { Ok(1.0 / t.require("x")?) };
        let out = run(&reciprocal, &trials(&[0.0, 2.0]));
        assert_eq!(out.values, vec![0.5]);
        assert_eq!(out.n_failed, 1);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_panicking_valuation_aborts_batch() {
        let lookup = |t: &Trial| -> Result<f64, TrialError> {
            let table = [1.0, 2.0];
            Ok(table[t.require("x")? as usize])
        };
        run(&lookup, &trials(&[0.0, 1.0, 5.0]));
    }

    #[test]
    fn test_all_failing_yields_empty_values() {
        let always = |_: &Trial| -> Result<f64, TrialError> {
            Err(TrialError::InvalidInput("unsupported".to_string()))
        };
        let out = run(&always, &trials(&[1.0, 2.0, 3.0]));
        assert!(out.values.is_empty());
        assert_eq!(out.n_failed, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let xs: Vec<f64> = (0..500).map(|i| i as f64 - 100.0).collect();
        let trials = trials(&xs);
        assert_eq!(
            run(&sqrt_valuation, &trials),
            run_parallel(&sqrt_valuation, &trials)
        );
    }
}
