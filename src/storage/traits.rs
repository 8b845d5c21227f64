//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{DocumentRecord, StoreTotals};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record for {url}: {reason}")]
    CorruptRecord { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable sink for crawled documents
///
/// `persist` is the only call the crawl driver makes. Storing the same URL
/// twice produces two records; implementations need not be idempotent.
pub trait Store {
    /// Writes one document record
    fn persist(&mut self, record: &DocumentRecord) -> StorageResult<()>;

    /// Returns the most recently stored record for `url`
    fn get_document(&self, url: &str) -> StorageResult<Option<DocumentRecord>>;

    /// Counts stored records
    fn count_documents(&self) -> StorageResult<u64>;

    /// Summarizes all stored records
    fn totals(&self) -> StorageResult<StoreTotals>;
}
