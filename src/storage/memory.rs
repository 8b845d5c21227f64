//! In-memory storage implementation

use crate::storage::traits::{Store, StorageResult};
use crate::storage::{DocumentRecord, StoreTotals};
use std::collections::HashSet;

/// Keeps every persisted record in a vector, in persist order
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<DocumentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }
}

impl Store for MemoryStore {
    fn persist(&mut self, record: &DocumentRecord) -> StorageResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn get_document(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        Ok(self.records.iter().rev().find(|r| r.url == url).cloned())
    }

    fn count_documents(&self) -> StorageResult<u64> {
        Ok(self.records.len() as u64)
    }

    fn totals(&self) -> StorageResult<StoreTotals> {
        let distinct: HashSet<&str> = self.records.iter().map(|r| r.url.as_str()).collect();
        Ok(StoreTotals {
            documents: self.records.len() as u64,
            distinct_urls: distinct.len() as u64,
            compressed_bytes: self
                .records
                .iter()
                .map(|r| r.compressed_text.len() as u64)
                .sum(),
            original_chars: self.records.iter().map(|r| r.original_len as u64).sum(),
        })
    }
}
