//! Configuration module for Huffcrawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use huffcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("huffcrawl.toml")).unwrap();
//! println!("Links followed up to generation {}", config.crawler.max_generation);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, FetcherConfig, OutputConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
