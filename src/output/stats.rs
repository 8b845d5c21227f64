//! Statistics generation from the document store
//!
//! This module provides functionality for extracting and displaying
//! storage statistics: document counts, compression totals and the most
//! recent run.

use crate::storage::{RunRecord, Store, StorageResult, StoreTotals};
use std::fmt::Write;

/// Storage statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub totals: StoreTotals,

    /// Most recent run, if the store tracks runs
    pub latest_run: Option<RunRecord>,
}

impl CrawlStatistics {
    /// Compressed bytes per source character, if anything is stored
    pub fn bytes_per_char(&self) -> Option<f64> {
        if self.totals.original_chars == 0 {
            return None;
        }
        Some(self.totals.compressed_bytes as f64 / self.totals.original_chars as f64)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
/// * `latest_run` - Run bookkeeping from the same database, if any
pub fn load_statistics(
    store: &dyn Store,
    latest_run: Option<RunRecord>,
) -> StorageResult<CrawlStatistics> {
    Ok(CrawlStatistics {
        totals: store.totals()?,
        latest_run,
    })
}

/// Renders statistics as the text printed by `--stats`
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();
    let totals = &stats.totals;

    let _ = writeln!(out, "=== Storage Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Documents stored: {}", totals.documents);
    let _ = writeln!(out, "  Distinct URLs: {}", totals.distinct_urls);
    let _ = writeln!(out, "  Original text: {} chars", totals.original_chars);
    let _ = writeln!(out, "  Compressed: {} bytes", totals.compressed_bytes);
    if let Some(ratio) = stats.bytes_per_char() {
        let _ = writeln!(out, "  Bytes per char: {:.3}", ratio);
    }
    let _ = writeln!(out);

    match &stats.latest_run {
        Some(run) => {
            let _ = writeln!(out, "Latest Run:");
            let _ = writeln!(out, "  ID: {}", run.id);
            let _ = writeln!(out, "  Status: {}", run.status.to_db_string());
            let _ = writeln!(out, "  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                let _ = writeln!(out, "  Finished: {}", finished);
            }
            let _ = writeln!(out, "  Pages fetched: {}", run.pages_fetched);
            let _ = writeln!(out, "  Documents stored: {}", run.documents_stored);
        }
        None => {
            let _ = writeln!(out, "No crawl runs recorded");
        }
    }

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress;
    use crate::storage::{DocumentRecord, MemoryStore, RunStatus};
    use chrono::Utc;

    #[test]
    fn test_empty_store() {
        let stats = load_statistics(&MemoryStore::new(), None).unwrap();
        assert_eq!(stats.totals, StoreTotals::default());
        assert_eq!(stats.bytes_per_char(), None);

        let text = format_statistics(&stats);
        assert!(text.contains("Documents stored: 0"));
        assert!(text.contains("No crawl runs recorded"));
    }

    #[test]
    fn test_totals_and_run() {
        let mut store = MemoryStore::new();
        let record = DocumentRecord::new(
            "http://a.test/",
            compress("Hello Hello").unwrap(),
            11,
            Utc::now(),
        );
        store.persist(&record).unwrap();

        let run = RunRecord {
            id: 3,
            started_at: "2024-01-01T00:00:00Z".to_string(),
            finished_at: None,
            config_hash: "abc".to_string(),
            status: RunStatus::Interrupted,
            pages_fetched: 4,
            documents_stored: 1,
        };
        let stats = load_statistics(&store, Some(run)).unwrap();

        assert_eq!(stats.totals.documents, 1);
        assert_eq!(stats.totals.compressed_bytes, 5);
        let text = format_statistics(&stats);
        assert!(text.contains("Original text: 11 chars"));
        assert!(text.contains("Status: interrupted"));
        assert!(text.contains("Pages fetched: 4"));
        assert!(!text.contains("Finished:"));
    }
}
