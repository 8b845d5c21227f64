//! HTML link discovery
//!
//! Finds the outgoing links of a page: every `<a href="...">` anywhere in
//! the document.
//!
//! Links with the `download` attribute are skipped, and so are hrefs that
//! [`resolve_link`] refuses (script, mail, phone, data and fragment links).
//! Admission (scheme, extensions, depth) is left to the frontier.

use crate::url::resolve_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Finds outgoing links in raw page content
pub trait LinkFinder {
    /// Returns absolute URLs in document order without repeats
    fn find_links(&self, raw: &str, base_url: &Url) -> Vec<String>;
}

/// [`LinkFinder`] for HTML built on `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkFinder;

impl HtmlLinkFinder {
    pub fn new() -> Self {
        Self
    }
}

impl LinkFinder for HtmlLinkFinder {
    fn find_links(&self, raw: &str, base_url: &Url) -> Vec<String> {
        let document = Html::parse_document(raw);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in document.select(&a_selector) {
                if element.value().attr("download").is_some() {
                    continue;
                }
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    if seen.insert(absolute_url.clone()) {
                        links.push(absolute_url);
                    }
                }
            }
        }

        links
    }
}
