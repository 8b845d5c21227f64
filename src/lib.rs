//! Huffcrawl: a bounded-depth crawler that stores Huffman-compressed text
//!
//! This crate crawls hyperlinks breadth-first up to a configured generation,
//! drops URLs it has already seen and pages whose extracted text it has
//! already stored, and persists each new document as a canonical Huffman
//! payload.

pub mod codec;
pub mod config;
pub mod crawler;
pub mod ledger;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl sessions
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Huffman codec errors
///
/// These signal a programming or data-integrity problem and are always
/// surfaced to the caller; the codec never returns partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Cannot build a code from an empty alphabet")]
    EmptyAlphabet,

    #[error("Undecodable bit sequence at bit {bit_offset}")]
    DecodeMismatch { bit_offset: usize },

    #[error("Payload has no header byte")]
    MissingHeader,

    #[error("Invalid padding header: {0}")]
    InvalidHeader(u8),

    #[error("Symbol {0:?} is not in the code table")]
    UnknownSymbol(char),

    #[error("Code exceeds the maximum supported length")]
    CodeTooLong,

    #[error("Malformed code table entry: {0}")]
    MalformedCode(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;


// Re-export commonly used types
pub use codec::{compress, decompress, CodeBook, Compressed};
pub use config::Config;
pub use crawler::{CrawlDriver, CrawlSummary, DriverState, Frontier, FrontierEntry};
pub use ledger::{ContentFingerprint, DedupLedger};
