//! Per-page indexing pipeline
//!
//! Orchestrates chunk → filter → embed → dedup → persist for a single page.
//! Replacement of previously stored rows happens only at the persistence
//! step: a page whose chunks all fail the relevance filter leaves earlier
//! rows for that URL untouched.

use crate::chunk::{split_text, CHUNK_OVERLAP, CHUNK_SIZE};
use crate::dedup::deduplicate;
use crate::embedding::{EmbedError, EmbeddingClient};
use crate::relevance::RelevanceFilter;
use crate::storage::{ContentStore, StorageError};
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort indexing of one page
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbedError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// What indexing a page produced
#[derive(Debug, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Chunks were embedded and the URL's stored rows were replaced
    Indexed { stored: usize },

    /// Nothing survived the relevance filter; the store was not touched
    NoRelevantChunks,
}

/// One-page ingestion pipeline with injected collaborators
pub struct PagePipeline {
    embedder: EmbeddingClient,
    store: Arc<dyn ContentStore>,
    filter: RelevanceFilter,
}

impl PagePipeline {
    pub fn new(
        embedder: EmbeddingClient,
        store: Arc<dyn ContentStore>,
        filter: RelevanceFilter,
    ) -> Self {
        Self {
            embedder,
            store,
            filter,
        }
    }

    /// Chunks, filters, embeds, deduplicates, and stores one page
    ///
    /// The filtered chunk texts go to the embedding provider as a single
    /// batch; the store replace is delete-then-insert for this URL only.
    pub async fn index_page(
        &self,
        url: &str,
        title: &str,
        markdown: &str,
    ) -> Result<IndexOutcome, PipelineError> {
        let raw_chunks = split_text(markdown, CHUNK_SIZE, CHUNK_OVERLAP);
        let raw_count = raw_chunks.len();
        tracing::debug!("Split {} into {} raw chunks", url, raw_count);

        let chunks = self.filter.filter(raw_chunks);
        if chunks.is_empty() {
            tracing::warn!("No relevant chunks after filtering for {}", url);
            return Ok(IndexOutcome::NoRelevantChunks);
        }
        tracing::info!(
            "Kept {}/{} chunks after filtering for {}",
            chunks.len(),
            raw_count,
            url
        );

        let vectors = self.embedder.embed(&chunks).await?;
        tracing::debug!("Generated {} embeddings for {}", vectors.len(), url);

        let (chunks, vectors) = deduplicate(chunks, vectors);

        let stored = self.store.replace_chunks(url, title, &chunks, &vectors)?;
        tracing::info!("Stored {} chunks from {}", stored, url);

        Ok(IndexOutcome::Indexed { stored })
    }
}
