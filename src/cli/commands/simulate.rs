//! `valuekit simulate` command - Monte Carlo simulation from a request file

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::format_number;
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{render, StatRow};
use crate::cli::viz::render_histogram;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{SimulationRequest, SEED_ENV};
use crate::core::driver::ValuationFn;
use crate::core::matrix::Trial;
use crate::core::monte_carlo::{MonteCarlo, TrialRecord};
use crate::core::negotiation::NegotiationRange;
use crate::core::summary::{histogram, percentile_label, HistogramBin, MonteCarloResult};
use crate::core::valuation::ValuationMethod;

#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    /// Simulation request file (YAML, or JSON by .json extension)
    pub file: PathBuf,

    /// Override the request's valuation method
    #[arg(long, short = 'm', value_enum)]
    pub method: Option<ValuationMethod>,

    /// Override the request's sample count
    #[arg(long, short = 'n')]
    pub samples: Option<usize>,

    /// Override the request's seed
    #[arg(long, env = SEED_ENV)]
    pub seed: Option<u64>,

    /// Evaluate trials in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Show ASCII histogram of the simulated valuations
    #[arg(long)]
    pub histogram: bool,

    /// Number of histogram bins
    #[arg(long, default_value_t = 40)]
    pub bins: usize,

    /// Write every trial's inputs and output to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Also derive a negotiation range from the percentiles
    #[arg(long)]
    pub negotiate: bool,

    /// Include raw trial values in YAML/JSON output
    #[arg(long)]
    pub include_values: bool,
}

/// Serialized form of a simulation run
#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    method: ValuationMethod,
    n_samples: usize,
    n_failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
    percentiles: &'a BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<&'a [f64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    negotiation: Option<NegotiationRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    histogram: Option<&'a [HistogramBin]>,
}

pub fn run(args: SimulateArgs, global: &GlobalOpts) -> Result<()> {
    let mut request = SimulationRequest::load(&args.file)?;
    if let Some(method) = args.method {
        request.method = method;
    }

    let missing = request.missing_parameters();
    if !missing.is_empty() {
        tracing::warn!(method = %request.method, ?missing, "request lacks method parameters");
        eprintln!(
            "{} {} needs {} - every trial will fail",
            style("!").yellow(),
            request.method,
            missing.join(", ")
        );
    }

    let mut config = request.monte_carlo_config();
    if let Some(n) = args.samples {
        config.n_samples = n;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.parallel = args.parallel;
    let levels = config.percentiles.clone();

    let sim = MonteCarlo::new(config);
    let result = if let Some(ref csv_path) = args.csv {
        let (result, records) = sim.run_with_trials(&request.method, &request.nominal_params)?;
        write_trials_csv(csv_path, &records)?;
        eprintln!(
            "{} Wrote {} trials to {}",
            style("✓").green(),
            records.len(),
            style(csv_path.display()).cyan()
        );
        result
    } else {
        sim.run(&request.method, &request.nominal_params)?
    };

    let negotiation = if args.negotiate {
        negotiation_range(&request, &result)
    } else {
        None
    };
    let bins = if args.histogram {
        histogram(&result.values, args.bins)
    } else {
        Vec::new()
    };

    match effective_format(global.format, false) {
        OutputFormat::Table | OutputFormat::Tsv => {
            print_summary(&request, &result, &levels, negotiation.as_ref());
            if args.histogram && !result.is_undefined() {
                let low = result.percentile("p10").unwrap_or(result.min);
                let high = result.percentile("p90").unwrap_or(result.max);
                println!();
                println!("{}", render_histogram(&bins, low, high));
            }
        }
        format => {
            let report = SimulationReport {
                method: request.method,
                n_samples: result.n_samples,
                n_failed: result.n_failed,
                seed: result.seed,
                mean: result.mean,
                std: result.std,
                min: result.min,
                max: result.max,
                percentiles: &result.percentiles,
                values: args.include_values.then_some(result.values.as_slice()),
                negotiation,
                histogram: args.histogram.then_some(bins.as_slice()),
            };
            print_serialized(&report, format)?;
        }
    }
    Ok(())
}

/// Base valuation for the negotiation range
///
/// The request's `base_valuation` wins; otherwise the method evaluated at the
/// nominal parameters, then the simulated median.
fn base_valuation(request: &SimulationRequest, result: &MonteCarloResult) -> Option<f64> {
    if let Some(base) = request.base_valuation {
        return Some(base);
    }
    let nominal = Trial::new(request.nominal_params.clone());
    match request.method.evaluate(&nominal) {
        Ok(v) if v.is_finite() => Some(v),
        _ => result.percentile("p50").filter(|v| v.is_finite()),
    }
}

fn negotiation_range(
    request: &SimulationRequest,
    result: &MonteCarloResult,
) -> Option<NegotiationRange> {
    let Some(base) = base_valuation(request, result) else {
        tracing::warn!("no base valuation available; skipping negotiation range");
        return None;
    };
    let range = NegotiationRange::from_result(base, result);
    if !range.is_ordered() {
        tracing::warn!(?range, "negotiation positions are not in ascending order");
    }
    Some(range)
}

fn print_summary(
    request: &SimulationRequest,
    result: &MonteCarloResult,
    levels: &[f64],
    negotiation: Option<&NegotiationRange>,
) {
    println!(
        "{} {}",
        style("Monte Carlo:").bold(),
        style(request.method).cyan()
    );

    if result.is_undefined() {
        println!(
            "{} insufficient data: all {} trials failed",
            style("!").yellow(),
            result.n_failed
        );
    }

    let mut rows = vec![
        StatRow::new("trials", result.n_samples.to_string()),
        StatRow::new("succeeded", result.n_succeeded().to_string()),
        StatRow::new("failed", result.n_failed.to_string()),
    ];
    if let Some(seed) = result.seed {
        rows.push(StatRow::new("seed", seed.to_string()));
    }
    rows.extend([
        StatRow::number("mean", result.mean),
        StatRow::number("std", result.std),
        StatRow::number("min", result.min),
        StatRow::number("max", result.max),
    ]);
    for &level in levels {
        let label = percentile_label(level);
        let value = result.percentile(&label).unwrap_or(f64::NAN);
        rows.push(StatRow::number(label, value));
    }
    println!("{}", render(rows));

    if let Some(range) = negotiation {
        println!();
        println!("{}", style("Negotiation Range:").bold());
        let rows = range
            .positions()
            .into_iter()
            .map(|(label, value)| StatRow::new(label, format_number(value)));
        println!("{}", render(rows));
    }
}

/// Write one CSV row per trial: index, every input, then the output (empty if failed)
fn write_trials_csv(path: &Path, records: &[TrialRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).into_diagnostic()?;

    let names: Vec<String> = records
        .first()
        .map(|r| r.inputs.iter().map(|(k, _)| k.to_string()).collect())
        .unwrap_or_default();

    let mut header = vec!["trial".to_string()];
    header.extend(names.iter().cloned());
    header.push("valuation".to_string());
    writer.write_record(&header).into_diagnostic()?;

    for (index, record) in records.iter().enumerate() {
        let mut row = vec![index.to_string()];
        row.extend(record.inputs.iter().map(|(_, v)| v.to_string()));
        row.push(record.output.map(|v| v.to_string()).unwrap_or_default());
        writer.write_record(&row).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    Ok(())
}
