//! Silt: same-domain web ingestion into an embedding-indexed content store
//!
//! This crate implements the write side of a content search system: it crawls
//! pages reachable from a seed URL, chunks and filters their text, embeds the
//! surviving chunks, drops near-duplicates, and persists the result with
//! freshness tracking so repeated crawls skip recently indexed URLs.

pub mod chunk;
pub mod config;
pub mod crawl;
pub mod dedup;
pub mod embedding;
pub mod fetch;
pub mod pipeline;
pub mod relevance;
pub mod server;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for silt operations
#[derive(Debug, Error)]
pub enum SiltError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] embedding::EmbedError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] pipeline::PipelineError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for silt operations
pub type Result<T> = std::result::Result<T, SiltError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawl::Crawler;
pub use crate::url::{extract_domain, same_domain_link};
pub use pipeline::PagePipeline;
