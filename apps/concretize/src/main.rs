//! # concretize — constraint-graph recording advisor
//!
//! The CLI front-end over `concretize-core`. Loads one symbolic-execution
//! constraint graph, runs the candidate enumerator, and reports which
//! instructions are most worth recording during trace capture.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 apps/concretize (THE BINARY)           │
//! │                                                         │
//! │   ┌─────────────┐        ┌───────────────────────┐    │
//! │   │   CLI       │        │   Config file layer   │    │
//! │   │  (clap)     │        │   (toml, optional)    │    │
//! │   └──────┬──────┘        └───────────┬───────────┘    │
//! │          └──────────────┬─────────────┘                │
//! │                         ▼                               │
//! │                ┌──────────────────┐                    │
//! │                │  concretize-core │                    │
//! │                │   (THE LOGIC)    │                    │
//! │                └──────────────────┘                    │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! There is no async boundary anywhere in this binary: the core is a pure,
//! synchronous batch computation over one already-loaded file, so `main`
//! is a plain synchronous function.
//!
//! ## Usage
//!
//! ```bash
//! concretize graph.json
//! concretize graph.json --top 10 --byte-cost 48
//! concretize graph.json --json
//! ```

mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = cli::Cli::parse();

    // CONCRETIZE_LOG selects the tracing filter; -v/--verbose raises the
    // default level the same way the teacher binary's global flag does.
    let default_filter = if cli.verbose { "concretize=debug" } else { "concretize=info" };
    let filter = std::env::var("CONCRETIZE_LOG")
        .ok()
        .and_then(|s| tracing_subscriber::EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    if !cli.quiet {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("{}", e);
        std::process::exit(exit_code_for(&e));
    }
}

fn print_banner() {
    println!(
        r#"
   ___                          _   _
  / __\___  _ __   ___ _ __ ___| |_(_)_______
 / /  / _ \| '_ \ / __| '__/ _ \ __| |_  / _ \
/ /__| (_) | | | | (__| | |  __/ |_| |/ /  __/
\____/\___/|_| |_|\___|_|  \___|\__|_/___\___|

  concretize v{}
  which instructions are worth recording?
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Maps each `AnalysisError` variant to a distinct, stable exit code.
fn exit_code_for(err: &concretize_core::AnalysisError) -> i32 {
    use concretize_core::AnalysisError::{
        InvalidEdgeWeight, InvariantViolation, Io, Schema, UnknownNodeReference, ZeroWidth,
    };
    match err {
        Schema(_) => 2,
        UnknownNodeReference { .. } => 3,
        InvalidEdgeWeight(_) => 4,
        ZeroWidth(_) => 5,
        InvariantViolation(_) => 6,
        Io(_) => 7,
    }
}
