//! Page fetching boundary
//!
//! Actual page access (JS execution, boilerplate pruning, markdown
//! conversion) belongs to an external rendering service; this module defines
//! the seam the crawl loop consumes and the HTTP client that talks to it.

mod renderer;

pub use renderer::RendererClient;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Result of fetching one URL through the rendering service
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,

    /// Page title as reported by the renderer, if any
    pub title: Option<String>,

    /// Markdown with navigation/boilerplate pruned away
    pub fit_markdown: String,

    /// Unpruned markdown fallback
    pub raw_markdown: String,

    /// Absolute hrefs the renderer classified as internal links
    pub internal_links: Vec<String>,
}

impl FetchedPage {
    /// Resolves the indexable content for this page
    ///
    /// Prefers the pruned markdown; falls back to raw markdown when pruning
    /// stripped everything. Returns None when both are blank.
    pub fn content(&self) -> Option<&str> {
        let fit = self.fit_markdown.trim();
        if !fit.is_empty() {
            return Some(fit);
        }
        let raw = self.raw_markdown.trim();
        if !raw.is_empty() {
            return Some(raw);
        }
        None
    }
}

/// Errors from the rendering service boundary
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to rendering service failed for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Rendering service returned HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Rendering service reported an unsuccessful crawl of {url}")]
    Unsuccessful { url: String },
}

/// A page-fetching capability
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
