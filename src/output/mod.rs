//! Output module for crawl reports
//!
//! This module handles:
//! - Summaries of a finished crawl session
//! - Statistics over everything in the document store

pub mod stats;

pub use stats::{format_statistics, load_statistics, print_statistics, CrawlStatistics};

use crate::crawler::CrawlSummary;
use std::fmt::Write;

/// Renders the counters of one crawl session
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    let heading = if summary.interrupted {
        "=== Crawl Interrupted ==="
    } else {
        "=== Crawl Complete ==="
    };
    let _ = writeln!(out, "{}\n", heading);
    let _ = writeln!(out, "  Pages processed: {}", summary.pages_processed);
    let _ = writeln!(out, "  Fetch failures: {}", summary.fetch_failures);
    let _ = writeln!(out, "  Without content: {}", summary.no_content);
    let _ = writeln!(out, "  Duplicate content: {}", summary.duplicate_content);
    let _ = writeln!(out, "  Documents stored: {}", summary.documents_stored);
    let _ = writeln!(out, "  Links enqueued: {}", summary.links_enqueued);
    let _ = writeln!(
        out,
        "  Compressed: {} chars into {} bytes",
        summary.original_chars, summary.compressed_bytes
    );

    out
}

/// Prints the counters of one crawl session to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_heading() {
        let mut summary = CrawlSummary {
            pages_processed: 3,
            documents_stored: 2,
            ..Default::default()
        };
        let text = format_summary(&summary);
        assert!(text.starts_with("=== Crawl Complete ==="));
        assert!(text.contains("Pages processed: 3"));
        assert!(text.contains("Documents stored: 2"));

        summary.interrupted = true;
        assert!(format_summary(&summary).starts_with("=== Crawl Interrupted ==="));
    }
}
