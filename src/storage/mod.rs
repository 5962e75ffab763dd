//! Persistent content store
//!
//! The store is the only long-lived owner of indexed chunks. It supports the
//! three operations the ingestion path needs: atomic delete-then-insert
//! replacement per source URL, a freshness existence query, and counting
//! queries for operational reporting.

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteContentStore;
pub use traits::{ContentStore, StorageError, StorageResult};

/// Dimensionality of stored embedding vectors
pub const EMBEDDING_DIM: usize = 768;

/// Rows per insert statement during a replace
pub const INSERT_BATCH_SIZE: usize = 500;
