//! # Concretize CLI Module
//!
//! Thin argument-parsing layer over `concretize_core`. The analysis itself
//! lives entirely in the core; everything here is I/O, formatting, and
//! config layering.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use concretize_core::AnalysisError;

pub use commands::cmd_analyze;

/// Rank candidate trace recordings by constraint-graph concretization
/// coverage.
///
/// Loads one symbolic-execution constraint graph and reports which
/// instructions are most worth recording during trace capture.
#[derive(Parser, Debug)]
#[command(name = "concretize")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the input constraint graph (JSON).
    pub graph: PathBuf,

    /// Explicitly request query-node coverage reporting (automatic whenever
    /// the graph has any node with Category "Q").
    #[arg(long)]
    pub query: bool,

    /// Number of top entries to print per ranking (overrides config file
    /// and the built-in default of 5).
    #[arg(long)]
    pub top: Option<usize>,

    /// Assumed fixed byte cost of one recorded instruction, the
    /// denominator of the coverage/frequency score.
    #[arg(long = "byte-cost")]
    pub byte_cost: Option<u64>,

    /// Emit the structured JSON report instead of text.
    #[arg(long)]
    pub json: bool,

    /// Optional TOML file supplying defaults for `--top`/`--byte-cost`/
    /// `--json`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Raise the tracing filter to debug.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress the startup banner.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), AnalysisError> {
    cmd_analyze(&cli)
}
