//! Crawl driver
//!
//! Owns one session: the frontier, the dedup ledger and the four
//! collaborators. Each [`CrawlDriver::step`] takes exactly one entry from the
//! frontier through fetch, extraction, content dedup, compression, storage
//! and link discovery. Entries are processed one at a time in FIFO order.

use crate::codec::compress;
use crate::config::CrawlerConfig;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Frontier, FrontierEntry, Offer};
use crate::crawler::parser::LinkFinder;
use crate::ledger::DedupLedger;
use crate::storage::{DocumentRecord, Store};
use crate::url::AdmissionFilter;
use crate::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use url::Url;

/// Session parameters taken from the `[crawler]` table
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub seeds: Vec<String>,
    pub max_generation: u32,
    pub filter: AdmissionFilter,
}

impl CrawlSettings {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            seeds: config.seeds.clone(),
            max_generation: config.max_generation,
            filter: config.admission_filter(),
        }
    }
}

/// Whether the driver has work left
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,

    /// The frontier is exhausted
    Done,
}

/// How one frontier entry ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Stored,
    DuplicateContent,
    NoContent,
    FetchFailed,
}

/// Result of a single [`CrawlDriver::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub url: String,
    pub generation: u32,
    pub outcome: PageOutcome,

    /// Links found on the page (0 when the fetch failed)
    pub links_found: usize,

    /// Of those, how many entered the frontier
    pub links_enqueued: usize,
}

/// Counters for a whole session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_processed: u64,
    pub fetch_failures: u64,
    pub no_content: u64,
    pub duplicate_content: u64,
    pub documents_stored: u64,
    pub links_enqueued: u64,
    pub compressed_bytes: u64,
    pub original_chars: u64,

    /// Stopped by cancellation before the frontier was exhausted
    pub interrupted: bool,
}

impl CrawlSummary {
    /// Pages whose content was retrieved, whatever happened to it afterwards
    pub fn pages_fetched(&self) -> u64 {
        self.pages_processed - self.fetch_failures
    }

    fn record(&mut self, report: &PageReport) {
        self.pages_processed += 1;
        self.links_enqueued += report.links_enqueued as u64;
        match report.outcome {
            PageOutcome::Stored => self.documents_stored += 1,
            PageOutcome::DuplicateContent => self.duplicate_content += 1,
            PageOutcome::NoContent => self.no_content += 1,
            PageOutcome::FetchFailed => self.fetch_failures += 1,
        }
    }
}

/// Runs a crawl session over pluggable collaborators
pub struct CrawlDriver<F, E, L, S> {
    fetcher: F,
    extractor: E,
    link_finder: L,
    store: S,
    ledger: DedupLedger,
    frontier: Frontier,
    filter: AdmissionFilter,
    max_generation: u32,
    summary: CrawlSummary,
    state: DriverState,
}

impl<F, E, L, S> CrawlDriver<F, E, L, S>
where
    F: Fetcher,
    E: Extractor,
    L: LinkFinder,
    S: Store,
{
    /// Creates a driver whose frontier holds the seeds at generation 0
    pub fn new(settings: CrawlSettings, fetcher: F, extractor: E, link_finder: L, store: S) -> Self {
        let mut ledger = DedupLedger::new();
        let frontier = Frontier::seeded(&settings.seeds, &mut ledger);
        let state = if frontier.is_empty() {
            DriverState::Done
        } else {
            DriverState::Running
        };

        Self {
            fetcher,
            extractor,
            link_finder,
            store,
            ledger,
            frontier,
            filter: settings.filter,
            max_generation: settings.max_generation,
            summary: CrawlSummary::default(),
            state,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn summary(&self) -> &CrawlSummary {
        &self.summary
    }

    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Processes the next frontier entry
    ///
    /// # Returns
    ///
    /// * `Ok(Some(report))` - One entry was processed
    /// * `Ok(None)` - The frontier is empty; the driver is `Done`
    /// * `Err(CrawlError)` - The store failed; the session cannot continue
    pub async fn step(&mut self) -> Result<Option<PageReport>> {
        let Some(entry) = self.frontier.pop() else {
            self.state = DriverState::Done;
            return Ok(None);
        };

        tracing::debug!("Processing URL: {} (generation {})", entry.url, entry.generation);

        let raw = match self.fetcher.fetch(&entry.url).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Fetch failed for {}: {}", entry.url, e);
                return Ok(Some(self.finish(entry, PageOutcome::FetchFailed, 0, 0)));
            }
        };

        let outcome = self.handle_content(&entry, &raw)?;
        let (links_found, links_enqueued) = self.discover_links(&entry, &raw);

        Ok(Some(self.finish(entry, outcome, links_found, links_enqueued)))
    }

    /// Steps until the frontier is exhausted
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        self.run_until(&AtomicBool::new(false)).await
    }

    /// Steps until the frontier is exhausted or `cancel` is set
    ///
    /// The flag is checked between steps, so an entry in flight always
    /// completes.
    pub async fn run_until(&mut self, cancel: &AtomicBool) -> Result<CrawlSummary> {
        let start_time = Instant::now();

        loop {
            if cancel.load(Ordering::SeqCst) {
                tracing::info!(
                    "Crawl interrupted with {} URLs still in the frontier",
                    self.frontier.len()
                );
                self.summary.interrupted = true;
                break;
            }

            if self.step().await?.is_none() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            let processed = self.summary.pages_processed;
            if processed % 10 == 0 {
                let rate = processed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} stored, {} in frontier, {:.2} pages/sec",
                    processed,
                    self.summary.documents_stored,
                    self.frontier.len(),
                    rate
                );
            }
        }

        tracing::info!(
            "Crawl finished: {} pages processed, {} documents stored in {:?}",
            self.summary.pages_processed,
            self.summary.documents_stored,
            start_time.elapsed()
        );

        Ok(self.summary.clone())
    }

    /// Extracts, dedups, compresses and stores the text of a fetched page
    fn handle_content(&mut self, entry: &FrontierEntry, raw: &str) -> Result<PageOutcome> {
        let text = match self.extractor.extract(raw) {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                tracing::warn!("Extraction produced no text for {}", entry.url);
                return Ok(PageOutcome::NoContent);
            }
            Err(e) => {
                tracing::warn!("Extraction failed for {}: {}", entry.url, e);
                return Ok(PageOutcome::NoContent);
            }
        };

        if self.ledger.admit_content(&text) {
            tracing::debug!(
                "Duplicate content at {} ({})",
                entry.url,
                DedupLedger::fingerprint(&text)
            );
            return Ok(PageOutcome::DuplicateContent);
        }

        let original_len = text.chars().count();
        let compressed = compress(&text)?;
        let record = DocumentRecord::new(entry.url.as_str(), compressed, original_len, Utc::now());

        if let Err(e) = self.store.persist(&record) {
            tracing::error!("Failed to store {}: {}", entry.url, e);
            return Err(e.into());
        }

        self.summary.compressed_bytes += record.compressed_text.len() as u64;
        self.summary.original_chars += original_len as u64;
        tracing::debug!(
            "Stored {} ({} chars in {} bytes)",
            entry.url,
            original_len,
            record.compressed_text.len()
        );

        Ok(PageOutcome::Stored)
    }

    /// Offers every link on the page to the frontier at the next generation
    fn discover_links(&mut self, entry: &FrontierEntry, raw: &str) -> (usize, usize) {
        let base_url = match Url::parse(&entry.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Cannot resolve links against {}: {}", entry.url, e);
                return (0, 0);
            }
        };

        let links = self.link_finder.find_links(raw, &base_url);
        let generation = entry.generation + 1;
        let enqueued = links
            .iter()
            .filter(|link| {
                self.frontier.offer(
                    link,
                    generation,
                    self.max_generation,
                    &self.filter,
                    &mut self.ledger,
                ) == Offer::Enqueued
            })
            .count();

        (links.len(), enqueued)
    }

    fn finish(
        &mut self,
        entry: FrontierEntry,
        outcome: PageOutcome,
        links_found: usize,
        links_enqueued: usize,
    ) -> PageReport {
        let report = PageReport {
            url: entry.url,
            generation: entry.generation,
            outcome,
            links_found,
            links_enqueued,
        };
        self.summary.record(&report);
        if self.frontier.is_empty() {
            self.state = DriverState::Done;
        }
        report
    }
}
