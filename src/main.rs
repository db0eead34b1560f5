//! Deadlink main entry point
//!
//! This is the command-line interface for the Deadlink broken link crawler.

use anyhow::Context;
use clap::Parser;
use deadlink::config::{load_config_with_hash, validate, validate_seed, Config};
use deadlink::output::{print_summary, CsvSink, Progress};
use deadlink::url::OriginPolicy;
use deadlink::Coordinator;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Deadlink: find broken links on a website
///
/// Deadlink crawls a site from a seed URL, checks every link it finds and
/// writes the broken ones to a CSV file as they are discovered.
#[derive(Parser, Debug)]
#[command(name = "deadlink")]
#[command(version)]
#[command(about = "Crawl a website and report broken links", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from (http or https)
    #[arg(value_name = "URL")]
    seed: String,

    /// CSV report path (default: broken_links_<host>.csv)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Crawl external pages too (they are always checked)
    #[arg(long)]
    follow_external: bool,

    /// Maximum link depth for pages on the seed's origin
    #[arg(long, value_name = "N")]
    max_internal_depth: Option<u32>,

    /// Maximum link depth for external pages
    #[arg(long, value_name = "N")]
    max_external_depth: Option<u32>,

    /// Pause between pages, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,

    /// Timeout for each request, in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<f64>,

    /// Timeout for page fetches, in seconds (default: --timeout)
    #[arg(long, value_name = "SECS")]
    page_timeout: Option<f64>,

    /// Link checks in flight at once for a page
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// How links are judged internal: prefix, seed-prefix or authority
    #[arg(long, value_name = "POLICY")]
    origin_policy: Option<OriginPolicy>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not draw the live status line
    #[arg(long)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid configuration")?;

    let seed = validate_seed(&cli.seed)?;

    let csv_path = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output.csv_path_for(&seed));
    let sink = CsvSink::create(&csv_path)
        .with_context(|| format!("failed to create {}", csv_path.display()))?;

    let mut coordinator = Coordinator::new(&config, seed, Arc::new(sink))?
        .with_progress(Progress::new(config.output.progress && !cli.quiet));
    spawn_interrupt_handler(coordinator.cancellation_token());

    let summary = coordinator.run().await.with_output_path(csv_path);
    print_summary(&summary);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr, below the status line.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("deadlink=warn,error"),
            1 => EnvFilter::new("deadlink=info,warn"),
            2 => EnvFilter::new("deadlink=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags over the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    let crawler = &mut config.crawler;

    if cli.follow_external {
        crawler.follow_external = true;
    }
    if let Some(depth) = cli.max_internal_depth {
        crawler.max_internal_depth = depth;
    }
    if let Some(depth) = cli.max_external_depth {
        crawler.max_external_depth = depth;
    }
    if let Some(delay) = cli.delay {
        crawler.delay_secs = delay;
    }
    if let Some(timeout) = cli.timeout {
        crawler.timeout_secs = timeout;
    }
    if let Some(timeout) = cli.page_timeout {
        crawler.page_timeout_secs = Some(timeout);
    }
    if let Some(concurrency) = cli.concurrency {
        crawler.max_concurrent_checks = concurrency;
    }
    if let Some(policy) = cli.origin_policy {
        crawler.origin_policy = policy;
    }
    if cli.no_progress {
        config.output.progress = false;
    }
}

/// Cancels the crawl on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping crawl");
            cancel.cancel();
        }
    });
}
