//! Huffcrawl main entry point
//!
//! This is the command-line interface for the Huffcrawl crawler.

use clap::Parser;
use huffcrawl::config::{load_config_with_hash, Config};
use huffcrawl::crawler::crawl;
use huffcrawl::storage::{SqliteStore, StorageError, Store};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Huffcrawl: a bounded-depth crawler with Huffman-compressed storage
///
/// Huffcrawl follows links breadth-first from a set of seed URLs up to a
/// configured generation, extracts the main text of every page, skips text
/// it has already stored and persists the rest Huffman-compressed.
#[derive(Parser, Debug)]
#[command(name = "huffcrawl")]
#[command(version)]
#[command(about = "A bounded-depth crawler with Huffman-compressed storage", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "decode"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "decode"])]
    stats: bool,

    /// Print the decompressed text stored for URL and exit
    #[arg(long, value_name = "URL", conflicts_with_all = ["dry_run", "stats"])]
    decode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(url) = &cli.decode {
        handle_decode(&config, url)?;
    } else {
        handle_crawl(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("huffcrawl=info,warn"),
            1 => EnvFilter::new("huffcrawl=debug,info"),
            2 => EnvFilter::new("huffcrawl=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Huffcrawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max generation: {}", config.crawler.max_generation);
    println!(
        "  Blocked extensions: {}",
        config.crawler.blocked_extensions.join(", ")
    );

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);

    println!("\nExtractor:");
    println!("  Minimum text length: {}", config.extractor.min_text_length);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.crawler.seeds.len()
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use huffcrawl::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store, store.get_latest_run()?)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --decode mode: prints the stored text for one URL
fn handle_decode(config: &Config, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::new(Path::new(&config.output.database_path))?;

    let record = store
        .get_document(url)?
        .ok_or_else(|| StorageError::DocumentNotFound(url.to_string()))?;
    tracing::info!(
        "Decoding {} ({} bytes, captured {})",
        record.url,
        record.compressed_text.len(),
        record.captured_at.to_rfc3339()
    );

    println!("{}", record.decode()?);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, config_hash: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Seeds: {}, max generation: {}",
        config.crawler.seeds.len(),
        config.crawler.max_generation
    );

    // Ctrl-C stops the crawl at the next page boundary
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupt received, finishing current page");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    match crawl(config, config_hash, &cancel).await {
        Ok(summary) => {
            huffcrawl::output::print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
