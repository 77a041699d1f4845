//! `valuekit negotiate` command - negotiation range from a valuation

use std::collections::BTreeMap;
use std::path::PathBuf;

use miette::Result;
use serde::Deserialize;
use tabled::Tabled;

use crate::cli::helpers::{format_number, parse_key_value};
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::render;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::negotiation::NegotiationRange;
use crate::yaml::parse_yaml_file;

#[derive(clap::Args, Debug)]
pub struct NegotiateArgs {
    /// Base valuation
    #[arg(long, allow_hyphen_values = true)]
    pub valuation: f64,

    /// Simulated percentile as label=value (repeatable), e.g. -p p10=60 -p p90=160
    #[arg(long = "percentile", short = 'p', value_parser = parse_key_value)]
    pub percentiles: Vec<(String, f64)>,

    /// Read percentiles from saved `simulate` output (YAML or JSON)
    #[arg(long, conflicts_with = "percentiles")]
    pub from: Option<PathBuf>,
}

/// The part of saved simulation output this command needs
///
/// Undefined percentiles are saved as JSON `null`.
#[derive(Debug, Deserialize)]
struct SavedPercentiles {
    #[serde(default)]
    percentiles: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Tabled)]
struct PositionRow {
    #[tabled(rename = "POSITION")]
    position: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "x BASE")]
    multiple: String,
}

pub fn run(args: NegotiateArgs, global: &GlobalOpts) -> Result<()> {
    let percentiles: Option<BTreeMap<String, f64>> = if let Some(ref path) = args.from {
        let saved: SavedPercentiles = parse_yaml_file(path)?;
        Some(
            saved
                .percentiles
                .into_iter()
                .filter_map(|(k, v)| v.filter(|v| v.is_finite()).map(|v| (k, v)))
                .collect(),
        )
    } else if args.percentiles.is_empty() {
        None
    } else {
        Some(args.percentiles.into_iter().collect())
    };

    let range = NegotiationRange::calculate(args.valuation, percentiles.as_ref());
    if !range.is_ordered() {
        tracing::warn!(?range, "negotiation positions are not in ascending order");
    }

    match effective_format(global.format, false) {
        OutputFormat::Table => {
            let rows = range.positions().into_iter().map(|(position, value)| PositionRow {
                position,
                value: format_number(value),
                multiple: if args.valuation != 0.0 {
                    format!("{:.2}", value / args.valuation)
                } else {
                    "-".to_string()
                },
            });
            println!("{}", render(rows));
        }
        OutputFormat::Tsv => {
            for (position, value) in range.positions() {
                println!("{}\t{}", position, value);
            }
        }
        format => print_serialized(&range, format)?,
    }
    Ok(())
}
