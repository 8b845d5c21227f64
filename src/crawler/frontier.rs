//! FIFO crawl frontier with a generation bound

use crate::ledger::DedupLedger;
use crate::url::{AdmissionFilter, FilterReason};
use std::collections::VecDeque;
use tracing::debug;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,

    /// Link distance from the seed that led here (seeds are 0)
    pub generation: u32,
}

/// What happened to a URL handed to [`Frontier::offer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Offer {
    Enqueued,

    /// The URL was recorded earlier in this session
    AlreadySeen,

    Rejected(FilterReason),

    /// Generation exceeds the configured maximum
    BeyondDepth,
}

/// Queue of URLs to fetch, oldest first
///
/// Every URL is offered to the ledger before anything else, so a URL that is
/// rejected or beyond the depth bound is still remembered and never
/// reconsidered.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    /// Creates a frontier holding each seed once at generation 0
    pub fn seeded<I, S>(seeds: I, ledger: &mut DedupLedger) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frontier = Self::default();
        for seed in seeds {
            let seed = seed.as_ref();
            if ledger.admit_url(seed) {
                debug!("Duplicate seed {} ignored", seed);
                continue;
            }
            frontier.queue.push_back(FrontierEntry {
                url: seed.to_string(),
                generation: 0,
            });
        }
        frontier
    }

    /// Removes and returns the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Offers a discovered URL at `generation`
    pub fn offer(
        &mut self,
        url: &str,
        generation: u32,
        max_generation: u32,
        filter: &AdmissionFilter,
        ledger: &mut DedupLedger,
    ) -> Offer {
        let offer = if ledger.admit_url(url) {
            Offer::AlreadySeen
        } else if let Err(reason) = filter.check(url) {
            Offer::Rejected(reason)
        } else if generation > max_generation {
            Offer::BeyondDepth
        } else {
            self.queue.push_back(FrontierEntry {
                url: url.to_string(),
                generation,
            });
            Offer::Enqueued
        };

        debug!("Offer {} (generation {}): {:?}", url, generation, offer);
        offer
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &FrontierEntry> {
        self.queue.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(seeds: &[&str]) -> (Frontier, DedupLedger) {
        let mut ledger = DedupLedger::new();
        let frontier = Frontier::seeded(seeds.iter().copied(), &mut ledger);
        (frontier, ledger)
    }

    #[test]
    fn test_seeds_enqueued_once_at_generation_zero() {
        let (mut frontier, ledger) = setup(&["http://a.test/", "http://b.test/", "http://a.test/"]);

        assert_eq!(frontier.len(), 2);
        assert!(ledger.contains_url("http://a.test/"));
        assert!(ledger.contains_url("http://b.test/"));

        let first = frontier.pop().unwrap();
        assert_eq!(first.url, "http://a.test/");
        assert_eq!(first.generation, 0);
        assert_eq!(frontier.pop().unwrap().url, "http://b.test/");
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_fifo_order() {
        let (mut frontier, mut ledger) = setup(&["http://a.test/"]);
        let filter = AdmissionFilter::default();

        for url in ["http://a.test/1", "http://a.test/2", "http://a.test/3"] {
            assert_eq!(
                frontier.offer(url, 1, 5, &filter, &mut ledger),
                Offer::Enqueued
            );
        }

        let order: Vec<_> = std::iter::from_fn(|| frontier.pop())
            .map(|entry| entry.url)
            .collect();
        assert_eq!(
            order,
            vec![
                "http://a.test/",
                "http://a.test/1",
                "http://a.test/2",
                "http://a.test/3",
            ]
        );
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_already_seen() {
        let (mut frontier, mut ledger) = setup(&["http://a.test/"]);
        let filter = AdmissionFilter::default();

        assert_eq!(
            frontier.offer("http://a.test/", 1, 5, &filter, &mut ledger),
            Offer::AlreadySeen
        );
        assert_eq!(
            frontier.offer("http://a.test/x", 1, 5, &filter, &mut ledger),
            Offer::Enqueued
        );
        assert_eq!(
            frontier.offer("http://a.test/x", 2, 5, &filter, &mut ledger),
            Offer::AlreadySeen
        );
        assert_eq!(frontier.len(), 2);
    }

    #[test]
    fn test_depth_bound() {
        let (mut frontier, mut ledger) = setup(&["http://a.test/"]);
        let filter = AdmissionFilter::default();

        assert_eq!(
            frontier.offer("http://a.test/1", 1, 1, &filter, &mut ledger),
            Offer::Enqueued
        );
        assert_eq!(
            frontier.offer("http://a.test/2", 2, 1, &filter, &mut ledger),
            Offer::BeyondDepth
        );
        // the refused URL stays recorded
        assert_eq!(
            frontier.offer("http://a.test/2", 1, 1, &filter, &mut ledger),
            Offer::AlreadySeen
        );
        assert!(frontier.iter().all(|entry| entry.generation <= 1));
    }

    #[test]
    fn test_zero_max_generation_keeps_seeds_only() {
        let (mut frontier, mut ledger) = setup(&["http://a.test/"]);
        let filter = AdmissionFilter::default();

        assert_eq!(
            frontier.offer("http://a.test/next", 1, 0, &filter, &mut ledger),
            Offer::BeyondDepth
        );
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_ftp_and_images_never_enqueued() {
        let (mut frontier, mut ledger) = setup(&["http://a.test/"]);
        let filter = AdmissionFilter::default();

        assert_eq!(
            frontier.offer("ftp://a.test/file", 1, 5, &filter, &mut ledger),
            Offer::Rejected(FilterReason::Scheme("ftp".to_string()))
        );
        assert_eq!(
            frontier.offer("http://a.test/logo.PNG", 1, 5, &filter, &mut ledger),
            Offer::Rejected(FilterReason::Extension("png".to_string()))
        );
        assert_eq!(
            frontier.offer("http://a.test/.png", 1, 5, &filter, &mut ledger),
            Offer::Rejected(FilterReason::Extension("png".to_string()))
        );
        assert_eq!(frontier.len(), 1);
        assert!(frontier
            .iter()
            .all(|entry| entry.url.starts_with("http") && !entry.url.ends_with(".PNG")));
    }

    #[test]
    fn test_seen_check_precedes_filter() {
        let (mut frontier, mut ledger) = setup(&[]);
        let filter = AdmissionFilter::default();

        assert!(matches!(
            frontier.offer("ftp://a.test/", 1, 5, &filter, &mut ledger),
            Offer::Rejected(_)
        ));
        assert_eq!(
            frontier.offer("ftp://a.test/", 1, 5, &filter, &mut ledger),
            Offer::AlreadySeen
        );
    }
}
