//! Storage trait and error types

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Chunk/vector count mismatch: {chunks} chunks, {vectors} vectors")]
    CountMismatch { chunks: usize, vectors: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for content store backends
///
/// Implementations must make `replace_chunks` atomic: a reader never sees a
/// mix of rows from two different index runs of the same source URL.
pub trait ContentStore: Send + Sync {
    /// Replaces all stored chunks for a source URL
    ///
    /// Deletes every existing row for `source_url`, then inserts one row per
    /// chunk/vector pair, all within a single transaction. Every vector must
    /// have [`crate::storage::EMBEDDING_DIM`] dimensions. The stored
    /// `scraped_at` timestamp is assigned here, at store time.
    ///
    /// # Returns
    ///
    /// The number of rows inserted.
    fn replace_chunks(
        &self,
        source_url: &str,
        page_title: &str,
        chunks: &[String],
        vectors: &[Vec<f32>],
    ) -> StorageResult<usize>;

    /// Returns true if any row for `source_url` was stored at or after `cutoff`
    ///
    /// Used by the crawl loop to skip URLs inside the cooldown window.
    fn has_chunks_since(&self, source_url: &str, cutoff: DateTime<Utc>) -> StorageResult<bool>;

    /// Total number of stored chunks
    fn count_chunks(&self) -> StorageResult<u64>;

    /// Number of chunks stored for one source URL
    fn count_chunks_for(&self, source_url: &str) -> StorageResult<u64>;

    /// Number of distinct source URLs with stored chunks
    fn count_sources(&self) -> StorageResult<u64>;

    /// Timestamp of the most recently stored chunk, if any
    fn latest_scraped_at(&self) -> StorageResult<Option<DateTime<Utc>>>;
}
