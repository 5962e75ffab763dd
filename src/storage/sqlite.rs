//! SQLite implementation of the content store

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ContentStore, StorageError, StorageResult};
use crate::storage::{EMBEDDING_DIM, INSERT_BATCH_SIZE};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed content store
///
/// The connection is guarded by an internal mutex so a single store instance
/// can be shared across concurrent crawl jobs behind an `Arc`. Combined with
/// one transaction per replace, delete+insert for any URL is atomic with
/// respect to every other job.
pub struct SqliteContentStore {
    conn: Mutex<Connection>,
}

impl SqliteContentStore {
    /// Opens (or creates) the store at the given path
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Fixed-precision RFC 3339 so stored timestamps compare lexicographically
fn timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        blob.extend_from_slice(&value.to_le_bytes());
    }
    blob
}

#[cfg(test)]
fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|bytes| f32::from_le_bytes(bytes.try_into().unwrap()))
        .collect()
}

impl ContentStore for SqliteContentStore {
    fn replace_chunks(
        &self,
        source_url: &str,
        page_title: &str,
        chunks: &[String],
        vectors: &[Vec<f32>],
    ) -> StorageResult<usize> {
        if chunks.len() != vectors.len() {
            return Err(StorageError::CountMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }
        for vector in vectors {
            if vector.len() != EMBEDDING_DIM {
                return Err(StorageError::DimensionMismatch {
                    expected: EMBEDDING_DIM,
                    actual: vector.len(),
                });
            }
        }

        let blobs: Vec<Vec<u8>> = vectors.iter().map(|v| vector_to_blob(v)).collect();
        let scraped_at = timestamp(Utc::now());

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM content_chunks WHERE source_url = ?1",
            params![source_url],
        )?;

        for (chunk_batch, blob_batch) in chunks
            .chunks(INSERT_BATCH_SIZE)
            .zip(blobs.chunks(INSERT_BATCH_SIZE))
        {
            let mut sql = String::from(
                "INSERT INTO content_chunks \
                 (chunk_text, embedding, source_url, page_title, scraped_at) VALUES ",
            );
            sql.push_str(&vec!["(?, ?, ?, ?, ?)"; chunk_batch.len()].join(", "));

            let mut bind: Vec<&dyn ToSql> = Vec::with_capacity(chunk_batch.len() * 5);
            for (text, blob) in chunk_batch.iter().zip(blob_batch) {
                bind.push(text);
                bind.push(blob);
                bind.push(&source_url);
                bind.push(&page_title);
                bind.push(&scraped_at);
            }

            tx.execute(&sql, bind.as_slice())?;
        }

        tx.commit()?;
        Ok(chunks.len())
    }

    fn has_chunks_since(&self, source_url: &str, cutoff: DateTime<Utc>) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let found = conn
            .query_row(
                "SELECT 1 FROM content_chunks \
                 WHERE source_url = ?1 AND scraped_at >= ?2 LIMIT 1",
                params![source_url, timestamp(cutoff)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn count_chunks(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM content_chunks", [], |row| {
            row.get(0)
        })?;
        Ok(count as u64)
    }

    fn count_chunks_for(&self, source_url: &str) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM content_chunks WHERE source_url = ?1",
            params![source_url],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_sources(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT source_url) FROM content_chunks",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn latest_scraped_at(&self) -> StorageResult<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let latest: Option<String> = conn.query_row(
            "SELECT MAX(scraped_at) FROM content_chunks",
            [],
            |row| row.get(0),
        )?;

        match latest {
            None => Ok(None),
            Some(raw) => {
                let parsed = DateTime::parse_from_rfc3339(&raw).map_err(|e| {
                    StorageError::Database(format!("Unparseable scraped_at '{}': {}", raw, e))
                })?;
                Ok(Some(parsed.with_timezone(&Utc)))
            }
        }
    }
}
