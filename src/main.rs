//! spm - Supplemental Poverty Measure threshold engine
//!
//! Serves threshold calculations over HTTP, exports the reference tables for
//! the front-end, and computes one-off thresholds from the command line.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spm={0},spm_threshold={0}", cli.log_level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli).await
}
