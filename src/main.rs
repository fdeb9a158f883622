//! goodbooks-crawler main entry point
//!
//! This is the command-line interface for the goodbooks.io crawler.

use anyhow::Context;
use clap::Parser;
use goodbooks_crawler::config::{load_config_with_hash, validate, Config};
use goodbooks_crawler::crawler::{clear_response_cache, open_response_cache, Coordinator};
use goodbooks_crawler::output::{print_report, JsonOutput};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// goodbooks-crawler: people and the books they recommend
///
/// Crawls the goodbooks.io people listing, every person page and every
/// distinct book page, then writes people.json and books.json and saves
/// portraits and covers locally.
#[derive(Parser, Debug)]
#[command(name = "goodbooks-crawler")]
#[command(version)]
#[command(about = "Crawls goodbooks.io into people.json and books.json", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Always fetch from the network and do not fill the response cache
    #[arg(long)]
    no_cache: bool,

    /// Empty the response cache before crawling
    #[arg(long, conflicts_with = "no_cache")]
    clear_cache: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load(cli.config.as_deref())?;
    if cli.no_cache {
        config.output.cache_path = String::new();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    if cli.clear_cache {
        handle_clear_cache(&config)?;
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("goodbooks_crawler=info,warn"),
            1 => EnvFilter::new("goodbooks_crawler=debug,info"),
            2 => EnvFilter::new("goodbooks_crawler=trace,debug"),
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

/// Loads the config file, or validates the built-in defaults when none is given
fn load(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            let config = Config::default();
            validate(&config).context("validating default configuration")?;
            Ok(config)
        }
    }
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== goodbooks-crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!(
        "  Allowed domains: {}",
        config.crawler.allowed_domains.join(", ")
    );
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  People: {}", config.output.people_path);
    println!("  Books: {}", config.output.books_path);
    println!("  Portraits: {}", config.output.photos_dir);
    println!("  Covers: {}", config.output.covers_dir);
    if config.output.cache_enabled() {
        println!("  Response cache: {}", config.output.cache_path);
    } else {
        println!("  Response cache: disabled");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles --clear-cache: drops every cached response
fn handle_clear_cache(config: &Config) -> anyhow::Result<()> {
    match clear_response_cache(&config.output).context("clearing response cache")? {
        Some(removed) => tracing::info!(
            "Cleared {} cached responses from {}",
            removed,
            config.output.cache_path
        ),
        None => tracing::warn!("--clear-cache ignored: response cache is disabled"),
    }
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling from {} with {} concurrent requests",
        config.crawler.seed_url,
        config.crawler.max_concurrent_requests
    );

    let output_config = config.output.clone();
    let cache = open_response_cache(&config.output)?;
    let coordinator = Coordinator::new(config, cache)?;

    // Truncates the previous results, so only once every other setup step
    // succeeded and before any network traffic
    let output = JsonOutput::create(&output_config)?;

    let run = match coordinator.run().await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    output.write(&run.catalog).context("writing JSON output")?;
    print_report(&run.report);

    Ok(())
}
