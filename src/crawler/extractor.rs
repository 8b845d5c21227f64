//! Main-content extraction
//!
//! Pulls the readable body text out of an HTML page. The first container
//! among `article`, `main`, `[role=main]` and `body` that yields enough text
//! wins. Scripts, styles and page chrome (nav, header, footer, aside, form)
//! are skipped, runs of whitespace collapse to a single space and block
//! elements become paragraph breaks.

use crate::config::ExtractorConfig;
use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

/// Containers tried in order of preference
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=main]", "body"];

const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside", "form",
    "iframe", "svg",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul",
    "ol", "dl", "dt", "dd", "blockquote", "pre", "table", "tr", "br", "hr", "figcaption",
];

/// Why no text came out of a page
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No article-like content found")]
    NoContent,
}

/// Turns raw page content into cleaned main-body text
pub trait Extractor {
    fn extract(&self, raw: &str) -> Result<String, ExtractError>;
}

/// [`Extractor`] for HTML built on `scraper`
#[derive(Debug, Clone)]
pub struct MainTextExtractor {
    min_text_length: usize,
    selectors: Vec<Selector>,
}

impl Default for MainTextExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl MainTextExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            min_text_length: config.min_text_length,
            selectors: CONTENT_SELECTORS
                .iter()
                .filter_map(|s| Selector::parse(s).ok())
                .collect(),
        }
    }
}

impl Extractor for MainTextExtractor {
    fn extract(&self, raw: &str) -> Result<String, ExtractError> {
        let document = Html::parse_document(raw);

        for selector in &self.selectors {
            let Some(container) = document.select(selector).next() else {
                continue;
            };

            let mut buffer = String::new();
            collect_text(container, &mut buffer);
            let text = normalize_paragraphs(&buffer);

            if text.chars().count() >= self.min_text_length {
                return Ok(text);
            }
        }

        Err(ExtractError::NoContent)
    }
}

/// Appends the visible text under `element`, marking block boundaries with '\n'
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
            }
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }

                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Collapses whitespace within each paragraph and joins paragraphs with a blank line
fn normalize_paragraphs(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
