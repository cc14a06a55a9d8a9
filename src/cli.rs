//! CLI command definitions and handlers

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use spm_threshold::api::{AppState, create_router};
use spm_threshold::calculation::{calculate_threshold_at, resolve_location};
use spm_threshold::config::ConfigLoader;
use spm_threshold::export::{DEFAULT_OUTPUT_DIR, write_data_files};
use spm_threshold::models::{
    BaseThresholdSource, GeoSelection, HouseholdInput, Tenure, ThresholdResult,
};

/// Supplemental Poverty Measure thresholds
#[derive(Parser, Debug)]
#[command(name = "spm")]
#[command(
    version,
    about = "Compute SPM poverty thresholds by household, tenure and location",
    after_help = "\
Examples:
  spm calculate --year 2024 --tenure renter --adults 2 --children 2
  spm calculate --year 2026 --tenure owner_with_mortgage --adults 1 --location CA
  spm export --out web/public/data
  spm serve --addr 0.0.0.0:3000"
)]
pub struct Cli {
    /// Directory of reference table YAML files (default: built-in tables)
    #[arg(long, global = true, env = "SPM_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        default_value = "info",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },

    /// Write the JSON data files the front-end reads
    Export {
        /// Output directory
        #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
        out: PathBuf,
    },

    /// Compute a single threshold and print the breakdown
    Calculate {
        /// Threshold year
        #[arg(long)]
        year: i32,

        /// Housing tenure (renter, owner_with_mortgage, owner_without_mortgage)
        #[arg(long)]
        tenure: Tenure,

        /// Number of people 18 or older
        #[arg(long, default_value = "2")]
        adults: u32,

        /// Number of people under 18
        #[arg(long, default_value = "0")]
        children: u32,

        /// Cost-level key, two-letter state code, or custom:<factor>
        #[arg(long, default_value = "national_average")]
        location: GeoSelection,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Runs the selected command.
pub async fn run(cli: Cli) -> Result<()> {
    let loader = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Serve { addr } => serve(loader, addr).await,
        Commands::Export { out } => {
            let written = write_data_files(&out, loader.config())
                .with_context(|| format!("Failed to export data to {}", out.display()))?;
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Commands::Calculate {
            year,
            tenure,
            adults,
            children,
            location,
            json,
        } => {
            let resolved = resolve_location(&location, loader.config())?;
            let household = HouseholdInput {
                year,
                tenure,
                num_adults: adults,
                num_children: children,
                geoadj: resolved.geoadj,
            };
            let result = calculate_threshold_at(&household, &resolved, loader.config())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_breakdown(&result, &resolved.label);
            }
            Ok(())
        }
    }
}

fn load_config(dir: Option<&PathBuf>) -> Result<ConfigLoader> {
    match dir {
        Some(dir) => ConfigLoader::load(dir)
            .with_context(|| format!("Failed to load reference tables from {}", dir.display())),
        None => ConfigLoader::embedded().context("Built-in reference tables are invalid"),
    }
}

async fn serve(loader: ConfigLoader, addr: SocketAddr) -> Result<()> {
    let app = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, "SPM threshold API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

fn print_breakdown(result: &ThresholdResult, location: &str) {
    let household = &result.household;
    println!(
        "{} {}, {} adult(s), {} child(ren), {}",
        household.year,
        household.tenure.label(),
        household.num_adults,
        household.num_children,
        location
    );
    println!();

    let source = match result.base_source {
        BaseThresholdSource::Published => "published",
        BaseThresholdSource::Forecast => "forecast",
    };
    println!(
        "  1. Base threshold        ${:>12} ({})",
        result.base_threshold.round_dp(0),
        source
    );
    println!(
        "  2. Equivalence scale     {:>13}",
        result.equivalence_scale.scale.round_dp(3).normalize()
    );
    println!("  3. Geographic adjustment {:>13}", household.geoadj);
    println!(
        "  4. Threshold             ${:>12}",
        result.threshold.round_dp(2)
    );
    println!(
        "     Monthly               ${:>12}",
        result.monthly_threshold
    );

    if let Some(url) = result
        .audit_trace
        .steps
        .iter()
        .find_map(|step| step.output["source_url"].as_str())
    {
        println!();
        println!("  source: {}", url);
    }

    for warning in &result.audit_trace.warnings {
        println!();
        println!("  note: {}", warning.message);
    }
}
