//! Sumi-Gather main entry point
//!
//! This is the command-line interface for the Sumi-Gather directory harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_gather::config::{load_config_with_hash, validate_category, Config};
use sumi_gather::crawler::harvest;
use sumi_gather::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Sumi-Gather: a polite business-directory harvester
///
/// Sumi-Gather discovers the subcategories of a directory category, walks
/// their paginated listings and writes one CSV row per business.
#[derive(Parser, Debug)]
#[command(name = "sumi-gather")]
#[command(version)]
#[command(about = "A polite business-directory harvester", long_about = None)]
struct Cli {
    /// Category to scrape (defaults to the configured category, "กีฬา")
    #[arg(short, long)]
    category: Option<String>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Dataset path (defaults to the configured filename pattern)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let category = cli
        .category
        .clone()
        .unwrap_or_else(|| config.site.category.clone());
    validate_category(&category).context("invalid --category")?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output.dataset_path(&category));

    if cli.dry_run {
        handle_dry_run(&config, &category, &output);
        return Ok(());
    }

    handle_harvest(config, &category, output, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_gather=info,warn"),
            1 => EnvFilter::new("sumi_gather=debug,info"),
            2 => EnvFilter::new("sumi_gather=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, category: &str, output: &std::path::Path) {
    println!("=== Sumi-Gather Dry Run ===\n");

    println!("Target:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Category: {}", category);
    match sumi_gather::url::category_url(&config.site.base_url, category) {
        Ok(url) => println!("  Category page: {}", url),
        Err(e) => println!("  Category page: invalid ({})", e),
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!(
        "  Timeout: {}s (connect {}s)",
        config.http.timeout_secs, config.http.connect_timeout_secs
    );

    println!("\nListing pages:");
    println!("  Attempts: {}", config.listing.max_attempts);
    println!("  Backoff: {}s", config.listing.backoff_delay);
    println!(
        "  Polite delay: {}s - {}s",
        config.listing.min_delay, config.listing.max_delay
    );
    println!(
        "  Empty streak threshold: {}",
        config.listing.empty_streak_threshold
    );

    println!("\nDetail pages:");
    println!("  Attempts: {}", config.detail.max_attempts);
    println!("  Backoff: {}s", config.detail.backoff_delay);
    println!(
        "  Polite delay: {}s - {}s",
        config.detail.min_delay, config.detail.max_delay
    );

    println!("\nOutput:");
    println!("  Dataset: {}", output.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: Config,
    category: &str,
    output: PathBuf,
    quiet: bool,
) -> anyhow::Result<()> {
    tracing::info!("Starting harvest of '{}' into {}", category, output.display());

    let summary = harvest(config, category, &output)
        .await
        .context("harvest failed")?;

    if !quiet {
        print_statistics(&summary);
    }

    Ok(())
}
