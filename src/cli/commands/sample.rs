//! `valuekit sample` command - draw values from one distribution

use miette::Result;

use crate::cli::helpers::parse_key_value;
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{render, StatRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::SEED_ENV;
use crate::core::distribution::{DistributionSpec, ParameterDistribution};
use crate::core::summary::{summarize, DEFAULT_PERCENTILES};

#[derive(clap::Args, Debug)]
pub struct SampleArgs {
    /// Distribution type: normal, uniform, triangular, lognormal, fixed
    #[arg(long = "type", short = 't')]
    pub distribution_type: String,

    /// Distribution parameter as key=value (repeatable), e.g. -p mean=0.2 -p std=0.05
    #[arg(long = "param", short = 'p', value_parser = parse_key_value)]
    pub params: Vec<(String, f64)>,

    /// Number of values to draw
    #[arg(long, short = 'n', default_value_t = 10)]
    pub samples: usize,

    /// Seed for reproducible draws
    #[arg(long, env = SEED_ENV)]
    pub seed: Option<u64>,

    /// Print summary statistics instead of the values
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: SampleArgs, global: &GlobalOpts) -> Result<()> {
    let spec = DistributionSpec {
        name: "sample".to_string(),
        distribution_type: args.distribution_type,
        params: args.params.into_iter().collect(),
    };
    let dist = ParameterDistribution::try_from(spec)?;
    let values = dist.sample(args.samples, args.seed)?;

    if args.summary {
        let result = summarize(values, 0, &DEFAULT_PERCENTILES);
        return match effective_format(global.format, false) {
            OutputFormat::Table | OutputFormat::Tsv => {
                let mut rows = vec![
                    StatRow::new("samples", result.n_samples.to_string()),
                    StatRow::number("mean", result.mean),
                    StatRow::number("std", result.std),
                    StatRow::number("min", result.min),
                    StatRow::number("max", result.max),
                ];
                rows.extend(
                    result
                        .percentiles
                        .iter()
                        .map(|(label, v)| StatRow::number(label.clone(), *v)),
                );
                println!("{}", render(rows));
                Ok(())
            }
            format => print_serialized(&result, format),
        };
    }

    match effective_format(global.format, true) {
        OutputFormat::Tsv => {
            for v in &values {
                println!("{}", v);
            }
        }
        OutputFormat::Table => {
            let rows = values
                .iter()
                .enumerate()
                .map(|(i, v)| StatRow::new(format!("#{}", i + 1), v.to_string()));
            println!("{}", render(rows));
        }
        format => print_serialized(&values, format)?,
    }
    Ok(())
}
