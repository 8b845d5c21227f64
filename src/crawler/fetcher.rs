//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - Single-attempt GET requests with request and connect timeouts
//! - Classifying failures (status, content type, network)
//!
//! There is no retry and no backoff: a failed fetch is reported once and the
//! driver moves on to the next frontier entry.

use crate::config::{FetcherConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Why a fetch produced no content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Retrieves the raw content behind a URL
///
/// One bounded-time attempt per call; implementations report failure instead
/// of retrying.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use huffcrawl::config::{FetcherConfig, UserAgentConfig};
/// use huffcrawl::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "huffcrawl".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&user_agent, &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    config: &FetcherConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &UserAgentConfig, config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, config)?,
        })
    }
}

impl Fetcher for HttpFetcher {
    /// Fetches a URL and returns its body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with HTML or no Content-Type | `Ok(body)` |
    /// | 2xx with another Content-Type | `NotHtml` |
    /// | any other status | `Status` |
    /// | timeout | `Timeout` |
    /// | connection failure (DNS, refused, TLS) | `Unreachable` |
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = content_type {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(FetchError::NotHtml {
                    url: url.to_string(),
                    content_type,
                });
            }
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Unreachable {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
