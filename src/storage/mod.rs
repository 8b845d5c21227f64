//! Storage module for persisting crawled documents
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Compressed document persistence, one row per successful store call
//! - Run tracking for crawl sessions
//!
//! An in-memory store is provided for embedding and tests.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StorageError, StorageResult};

use crate::codec::{decompress, CodeTable, Compressed, ReverseTable};
use crate::CodecError;
use chrono::{DateTime, Utc};

/// A persisted document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub url: String,

    /// Pad-length header byte followed by the packed code bits
    pub compressed_text: Vec<u8>,

    /// Code table of the session that produced `compressed_text`
    pub code_table: CodeTable,

    /// Length of the source text in characters
    pub original_len: usize,

    pub captured_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Builds a record from a compression session
    pub fn new(
        url: impl Into<String>,
        compressed: Compressed,
        original_len: usize,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            compressed_text: compressed.payload,
            code_table: compressed.codebook.codes,
            original_len,
            captured_at,
        }
    }

    /// Decompresses the stored payload with the stored code table
    pub fn decode(&self) -> Result<String, CodecError> {
        decompress(
            &self.compressed_text,
            &ReverseTable::from_codes(&self.code_table),
        )
    }
}

/// Aggregate numbers over all stored documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreTotals {
    pub documents: u64,
    pub distinct_urls: u64,
    pub compressed_bytes: u64,
    pub original_chars: u64,
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub pages_fetched: u64,
    pub documents_stored: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Interrupted,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
