//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait,
//! plus run bookkeeping for crawl sessions.

use crate::codec::CodeTable;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StorageError, StorageResult};
use crate::storage::{DocumentRecord, RunRecord, RunStatus, StoreTotals};
use chrono::{TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,

    /// Run that newly persisted documents are attributed to
    current_run: Option<i64>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            current_run: None,
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            current_run: None,
        })
    }

    // ===== Run Management =====

    /// Starts a new run; documents persisted afterwards are attributed to it
    pub fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        let run_id = self.conn.last_insert_rowid();
        self.current_run = Some(run_id);
        Ok(run_id)
    }

    /// Closes a run with its final status and counters
    pub fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        pages_fetched: u64,
        documents_stored: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, pages_fetched = ?3,
             documents_stored = ?4 WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                pages_fetched as i64,
                documents_stored as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        if self.current_run == Some(run_id) {
            self.current_run = None;
        }
        Ok(())
    }

    pub fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status, pages_fetched,
                 documents_stored FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    pub fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status, pages_fetched,
                 documents_stored FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    /// Lists stored URLs in storage order
    pub fn list_urls(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT url FROM documents ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut urls = Vec::new();
        for row in rows {
            urls.push(row?);
        }
        Ok(urls)
    }
}

impl Store for SqliteStore {
    fn persist(&mut self, record: &DocumentRecord) -> StorageResult<()> {
        let code_table = serde_json::to_string(&record.code_table.to_strings())?;
        self.conn.execute(
            "INSERT INTO documents (url, compressed_text, code_table, original_len, captured_at, run_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.url,
                record.compressed_text,
                code_table,
                record.original_len as i64,
                record.captured_at.timestamp_millis(),
                self.current_run
            ],
        )?;
        Ok(())
    }

    fn get_document(&self, url: &str) -> StorageResult<Option<DocumentRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT compressed_text, code_table, original_len, captured_at
                 FROM documents WHERE url = ?1 ORDER BY id DESC LIMIT 1",
                params![url],
                |row| {
                    Ok((
                        row.get::<_, Vec<u8>>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((compressed_text, code_table_json, original_len, captured_ms)) = row else {
            return Ok(None);
        };

        let entries: BTreeMap<String, String> = serde_json::from_str(&code_table_json)?;
        let code_table =
            CodeTable::from_strings(&entries).map_err(|e| StorageError::CorruptRecord {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        let captured_at = Utc
            .timestamp_millis_opt(captured_ms)
            .single()
            .ok_or_else(|| StorageError::CorruptRecord {
                url: url.to_string(),
                reason: format!("invalid timestamp {}", captured_ms),
            })?;

        Ok(Some(DocumentRecord {
            url: url.to_string(),
            compressed_text,
            code_table,
            original_len: original_len as usize,
            captured_at,
        }))
    }

    fn count_documents(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn totals(&self) -> StorageResult<StoreTotals> {
        let totals = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT url), COALESCE(SUM(LENGTH(compressed_text)), 0),
             COALESCE(SUM(original_len), 0) FROM documents",
            [],
            |row| {
                Ok(StoreTotals {
                    documents: row.get::<_, i64>(0)? as u64,
                    distinct_urls: row.get::<_, i64>(1)? as u64,
                    compressed_bytes: row.get::<_, i64>(2)? as u64,
                    original_chars: row.get::<_, i64>(3)? as u64,
                })
            },
        )?;
        Ok(totals)
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Failed),
        pages_fetched: row.get::<_, i64>(5)? as u64,
        documents_stored: row.get::<_, i64>(6)? as u64,
    })
}
