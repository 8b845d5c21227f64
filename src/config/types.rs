use crate::url::{AdmissionFilter, DEFAULT_BLOCKED_EXTENSIONS};
use serde::Deserialize;

/// Main configuration structure for Huffcrawl
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Frontier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Deepest generation that may be enqueued (0 = seed URLs only)
    ///
    /// Deliberately has no default.
    #[serde(rename = "max-generation")]
    pub max_generation: u32,

    /// URLs enqueued at generation 0
    pub seeds: Vec<String>,

    /// Path extensions never enqueued, replacing the built-in list when set
    #[serde(rename = "blocked-extensions", default = "default_blocked_extensions")]
    pub blocked_extensions: Vec<String>,
}

impl CrawlerConfig {
    /// Builds the admission filter described by this configuration
    pub fn admission_filter(&self) -> AdmissionFilter {
        AdmissionFilter::with_blocked_extensions(&self.blocked_extensions)
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Main-content extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Extracted text shorter than this (in characters) counts as no content
    #[serde(rename = "min-text-length", default = "default_min_text_length")]
    pub min_text_length: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_blocked_extensions() -> Vec<String> {
    DEFAULT_BLOCKED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_min_text_length() -> usize {
    1
}
