//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with request and connect timeouts
//! - Main-text extraction and link discovery
//! - The FIFO frontier with its generation bound
//! - The driver that ties a session together

mod driver;
mod extractor;
mod fetcher;
mod frontier;
mod parser;

pub use driver::{CrawlDriver, CrawlSettings, CrawlSummary, DriverState, PageOutcome, PageReport};
pub use extractor::{ExtractError, Extractor, MainTextExtractor};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry, Offer};
pub use parser::{HtmlLinkFinder, LinkFinder};

use crate::config::Config;
use crate::storage::{RunStatus, SqliteStore};
use std::path::Path;
use std::sync::atomic::AtomicBool;

/// Runs a complete crawl session against the configured database
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the storage layer and record a new run
/// 2. Build the HTTP client
/// 3. Drive the frontier until it is empty or `cancel` is set
/// 4. Close the run as completed, interrupted or failed
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, stored on the run
/// * `cancel` - Checked between pages; setting it ends the session early
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Counters of the finished session
/// * `Err(CrawlError)` - Setup or storage failed
pub async fn crawl(
    config: &Config,
    config_hash: &str,
    cancel: &AtomicBool,
) -> crate::Result<CrawlSummary> {
    let mut store = SqliteStore::new(Path::new(&config.output.database_path))?;
    let run_id = store.create_run(config_hash)?;
    tracing::info!("Starting crawl run {}", run_id);

    let fetcher = match HttpFetcher::new(&config.user_agent, &config.fetcher) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            return close_run(&mut store, run_id, &CrawlSummary::default(), Err(e.into()));
        }
    };

    let mut driver = CrawlDriver::new(
        CrawlSettings::from_config(&config.crawler),
        fetcher,
        MainTextExtractor::new(&config.extractor),
        HtmlLinkFinder::new(),
        store,
    );

    let result = driver.run_until(cancel).await;
    let summary = driver.summary().clone();
    let mut store = driver.into_store();

    close_run(&mut store, run_id, &summary, result)
}

/// Records the outcome of a session on its run row
///
/// A crawl error takes precedence over a failure to update the run, which is
/// only logged in that case.
fn close_run(
    store: &mut SqliteStore,
    run_id: i64,
    summary: &CrawlSummary,
    result: crate::Result<CrawlSummary>,
) -> crate::Result<CrawlSummary> {
    let status = match &result {
        Ok(summary) if summary.interrupted => RunStatus::Interrupted,
        Ok(_) => RunStatus::Completed,
        Err(e) => {
            tracing::error!("Crawl run {} failed: {}", run_id, e);
            RunStatus::Failed
        }
    };
    let finished = store.finish_run(
        run_id,
        status,
        summary.pages_fetched(),
        summary.documents_stored,
    );

    match (result, finished) {
        (Err(e), Err(finish_error)) => {
            tracing::error!("Failed to close run {}: {}", run_id, finish_error);
            Err(e)
        }
        (result, finished) => {
            finished?;
            result
        }
    }
}
