//! Database schema definitions
//!
//! Embeddings are stored as little-endian f32 BLOBs; similarity indexing is
//! the concern of whatever reads this store, not of the ingestion path.

/// SQL schema for the content store
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS content_chunks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chunk_text TEXT NOT NULL,
    embedding BLOB NOT NULL,
    source_url TEXT NOT NULL,
    page_title TEXT NOT NULL,
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_source_url ON content_chunks(source_url);
CREATE INDEX IF NOT EXISTS idx_chunks_freshness ON content_chunks(source_url, scraped_at);
"#;

/// Initializes the database schema (idempotent)
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
