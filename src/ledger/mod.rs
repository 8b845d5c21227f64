//! Dedup ledger for one crawl session
//!
//! Two independent, grow-only membership sets:
//! - visited URLs, compared as exact strings (no normalization)
//! - fingerprints of extracted text, so the same article reached through
//!   different URLs is stored once
//!
//! Admission is check-and-set: the first call for a key answers "not seen"
//! and records it, every later call answers "seen".

mod fingerprint;

pub use fingerprint::ContentFingerprint;

use std::collections::HashSet;

/// Visited URLs and seen content fingerprints
#[derive(Debug, Default)]
pub struct DedupLedger {
    visited: HashSet<String>,
    fingerprints: HashSet<ContentFingerprint>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and reports whether it had been seen before
    pub fn admit_url(&mut self, url: &str) -> bool {
        if self.visited.contains(url) {
            return true;
        }
        self.visited.insert(url.to_string());
        false
    }

    /// Fingerprints `text`, records it and reports whether it had been seen before
    pub fn admit_content(&mut self, text: &str) -> bool {
        !self.fingerprints.insert(Self::fingerprint(text))
    }

    /// Fingerprint `admit_content` would record for `text`
    pub fn fingerprint(text: &str) -> ContentFingerprint {
        ContentFingerprint::of(text)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn contains_content(&self, text: &str) -> bool {
        self.fingerprints.contains(&Self::fingerprint(text))
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn fingerprint_count(&self) -> usize {
        self.fingerprints.len()
    }
}
