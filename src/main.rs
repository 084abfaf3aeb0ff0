//! Passwatch main entry point
//!
//! Command-line interface for the satellite pass scraper: load and
//! validate a TOML config, run one scrape batch, and map the run status
//! to the process exit code.

use anyhow::Context;
use clap::Parser;
use passwatch::config::{load_config, validate, Config};
use passwatch::scrape::{build_page_request, run_scrape};
use passwatch::RunStatus;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Passwatch: scrape satellite overhead-pass predictions
///
/// Fetches the configured number of result pages from the upstream pass
/// endpoint, parses them into records, and writes one JSON file per
/// target under the configured output root.
#[derive(Parser, Debug)]
#[command(name = "passwatch")]
#[command(version)]
#[command(about = "Satellite pass-prediction scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the requests that would be made without
    /// touching the network
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(());
    }

    let report = run_scrape(config).await?;

    match report.status {
        RunStatus::Success => Ok(()),
        RunStatus::PartialSuccess => {
            tracing::warn!(
                "Partial scrape: {} of {} pages failed, kept {} records",
                report.failed_pages(),
                report.pages.len(),
                report.records.len()
            );
            Ok(())
        }
        RunStatus::Failure => {
            tracing::error!("Scrape failed: no records from any page");
            std::process::exit(1);
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("passwatch=info,warn"),
            1 => EnvFilter::new("passwatch=debug,info"),
            2 => EnvFilter::new("passwatch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: validate and print the planned page requests
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    validate(config)?;

    println!("=== Passwatch Dry Run ===\n");

    println!("Target:");
    println!("  Satellite id: {}", config.target.sat_id);
    if !config.target.name.is_empty() {
        println!("  Name: {}", config.target.name);
    }

    println!("\nObserver:");
    println!("  Latitude: {}", config.observer.latitude);
    println!("  Longitude: {}", config.observer.longitude);
    println!("  Place: {}", config.observer.place_name);
    println!("  Altitude: {} m", config.observer.altitude);
    println!("  Timezone: {}", config.observer.timezone);

    println!("\nOutput:");
    println!("  Data root: {}", config.output.data_root);
    println!(
        "  Session cookie: {}",
        if config.session.cookie.is_empty() {
            "(none)"
        } else {
            "(configured)"
        }
    );

    let endpoint = Url::parse(&config.scrape.endpoint)?;
    println!("\nPlanned requests ({} pages):", config.scrape.pages);
    for page in 1..=config.scrape.pages {
        let request = build_page_request(
            &config.target,
            &config.observer,
            page,
            config.scrape.pages,
            &endpoint,
            &config.session.cookie,
        )?;
        println!("  {}", request.url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}
