//! SortCopy CLI - Concurrent Extension-Bucket File Sorter
//!
//! Thin orchestrator: parse arguments, initialize logging, validate the
//! paths, run the engine. The walk itself never aborts on per-file
//! failures, so the exit code is 0 whenever traversal completes; 1 is
//! reserved for failed preconditions and errors escaping the run.

use anyhow::Context;
use clap::Parser;
use sortcopy::config::{CliArgs, SortConfig};
use sortcopy::core::SortEngine;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_logging(&args);

    // Handle result
    if let Err(e) = run(args).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = SortConfig::from_cli(&args)?;

    config
        .validate()
        .context("pre-run path validation failed")?;

    let engine = SortEngine::new(config);
    let summary = engine.execute().await.context("traversal failed")?;

    if !args.quiet {
        summary.print_summary();
    }

    Ok(())
}
