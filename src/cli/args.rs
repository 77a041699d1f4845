//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::negotiate::NegotiateArgs;
use crate::cli::commands::sample::SampleArgs;
use crate::cli::commands::simulate::SimulateArgs;

#[derive(Parser, Debug)]
#[command(
    name = "valuekit",
    version,
    about = "Monte Carlo valuation ranges for startup finance",
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// More log output on stderr (-v info, -vv debug); VALUEKIT_LOG overrides
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a Monte Carlo simulation from a request file
    Simulate(SimulateArgs),

    /// Draw values from a single distribution
    Sample(SampleArgs),

    /// Derive a negotiation range from a valuation and optional percentiles
    Negotiate(NegotiateArgs),

    /// List the built-in valuation methods and their parameters
    Methods,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table for summaries, one value per line for lists
    #[default]
    Auto,
    Yaml,
    Json,
    Table,
    /// Tab-separated, one record per line
    Tsv,
}
