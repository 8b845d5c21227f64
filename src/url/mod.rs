//! URL handling for the frontier
//!
//! This module provides link resolution for discovered hrefs and the
//! admission filter that decides which URLs are worth fetching at all.
//! URLs are never normalized: the dedup ledger compares exact strings.

mod filter;
mod resolve;

pub use filter::{AdmissionFilter, FilterReason, DEFAULT_BLOCKED_EXTENSIONS};
pub use resolve::resolve_link;
