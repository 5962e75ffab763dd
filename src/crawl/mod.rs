//! Crawl frontier controller
//!
//! Drives one crawl job: a FIFO breadth-first traversal of same-domain pages
//! starting from a seed URL, bounded by a page budget. Every failure while
//! processing a URL is contained at that URL; a job ends only when its
//! frontier drains or its budget is spent.

use crate::fetch::PageFetcher;
use crate::pipeline::PagePipeline;
use crate::storage::ContentStore;
use crate::url::{extract_domain, same_domain_link};
use crate::{SiltError, UrlError};
use chrono::{Duration, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use url::Url;

/// Traversal state owned by a single crawl job
///
/// One instance per job, created at job start and dropped at job end; never
/// shared across jobs.
struct CrawlJob {
    domain: String,
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    pages_processed: u32,
}

/// Crawl driver with injected collaborators
///
/// Cheap to construct; the trigger surface builds one per spawned job.
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    pipeline: Arc<PagePipeline>,
    store: Arc<dyn ContentStore>,
    cooldown_hours: u32,
}

impl Crawler {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        pipeline: Arc<PagePipeline>,
        store: Arc<dyn ContentStore>,
        cooldown_hours: u32,
    ) -> Self {
        Self {
            fetcher,
            pipeline,
            store,
            cooldown_hours,
        }
    }

    /// Crawls same-domain pages breadth-first from a seed URL
    ///
    /// Processes URLs strictly one at a time: each page is fetched and fully
    /// indexed before the next frontier entry is popped. Returns the number
    /// of pages that completed the pipeline. Fails only when the seed URL
    /// itself is unusable; everything after that is contained per URL.
    pub async fn crawl(&self, start_url: &str, max_pages: u32) -> Result<u32, SiltError> {
        let seed = Url::parse(start_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        let domain =
            extract_domain(&seed).ok_or_else(|| UrlError::MissingHost(start_url.to_string()))?;

        let mut job = CrawlJob {
            domain,
            visited: HashSet::new(),
            frontier: VecDeque::from([seed.to_string()]),
            pages_processed: 0,
        };

        while job.pages_processed < max_pages {
            let Some(url) = job.frontier.pop_front() else {
                break;
            };

            if job.visited.contains(&url) {
                continue;
            }
            job.visited.insert(url.clone());

            let cutoff = Utc::now() - Duration::hours(self.cooldown_hours as i64);
            match self.store.has_chunks_since(&url, cutoff) {
                Ok(true) => {
                    tracing::info!(
                        "Skipping {} — indexed within the last {} hours",
                        url,
                        self.cooldown_hours
                    );
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    // A broken freshness read must not starve the pipeline
                    tracing::warn!("Freshness check failed for {}: {}; treating as stale", url, e);
                }
            }

            tracing::info!(
                "[{}/{}] Crawling {}",
                job.pages_processed + 1,
                max_pages,
                url
            );

            let parsed = match Url::parse(&url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Dropping unparseable frontier entry {}: {}", url, e);
                    continue;
                }
            };

            let page = match self.fetcher.fetch(&parsed).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Failed to fetch {}: {}", url, e);
                    continue;
                }
            };

            // Discovery precedes content resolution: an empty page still
            // contributes its links. Discovery order is preserved.
            for href in &page.internal_links {
                if let Some(link) = same_domain_link(href, &job.domain) {
                    if !job.visited.contains(&link) {
                        job.frontier.push_back(link);
                    }
                }
            }

            let Some(markdown) = page.content() else {
                tracing::warn!("No content from {}, skipping", url);
                continue;
            };

            let title = page.title.clone().unwrap_or_else(|| url.clone());

            match self.pipeline.index_page(&url, &title, markdown).await {
                Ok(_) => job.pages_processed += 1,
                Err(e) => tracing::error!("Failed to index {}: {}", url, e),
            }
        }

        tracing::info!(
            "Crawl complete: {} pages processed from {}",
            job.pages_processed,
            start_url
        );
        Ok(job.pages_processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{EmbeddingClient, EmbeddingProvider, ProviderError};
    use crate::fetch::{FetchError, FetchedPage};
    use crate::relevance::RelevanceFilter;
    use crate::storage::{SqliteContentStore, EMBEDDING_DIM};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory site served by a fake fetcher; records fetch order
    struct FakeSite {
        pages: HashMap<String, FetchedPage>,
        fetch_log: Mutex<Vec<String>>,
    }

    impl FakeSite {
        fn new(pages: Vec<FetchedPage>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|page| (page.url.to_string(), page))
                    .collect(),
                fetch_log: Mutex::new(Vec::new()),
            }
        }

        fn fetched(&self) -> Vec<String> {
            self.fetch_log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for FakeSite {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.fetch_log.lock().unwrap().push(url.to_string());
            self.pages
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Unsuccessful {
                    url: url.to_string(),
                })
        }
    }

    struct FakeProvider;

    #[async_trait]
    impl EmbeddingProvider for FakeProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    let mut v = vec![0.0; EMBEDDING_DIM];
                    v[i % EMBEDDING_DIM] = 1.0;
                    v
                })
                .collect())
        }
    }

    fn relevant_markdown() -> String {
        "The new console revision pairs a redesigned cooling assembly with a \
         quieter fan profile, a smaller power supply, and a faster storage \
         controller than the model it replaces on shelves."
            .to_string()
    }

    fn page(url: &str, links: &[&str]) -> FetchedPage {
        FetchedPage {
            url: Url::parse(url).unwrap(),
            title: Some(format!("Title of {}", url)),
            fit_markdown: relevant_markdown(),
            raw_markdown: String::new(),
            internal_links: links.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn empty_page(url: &str, links: &[&str]) -> FetchedPage {
        let mut page = page(url, links);
        page.fit_markdown = String::new();
        page
    }

    fn crawler(site: Arc<FakeSite>, store: Arc<SqliteContentStore>) -> Crawler {
        let embedder = EmbeddingClient::new(
            Arc::new(FakeProvider),
            5,
            std::time::Duration::from_millis(1),
        );
        let filter = RelevanceFilter::new(&["console".to_string()]).unwrap();
        let pipeline = Arc::new(PagePipeline::new(embedder, store.clone(), filter));
        Crawler::new(site, pipeline, store, 24)
    }

    #[tokio::test]
    async fn test_single_page_crawl() {
        let site = Arc::new(FakeSite::new(vec![page("https://example.com/", &[])]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store.clone())
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        assert_eq!(pages, 1);
        assert_eq!(store.count_chunks_for("https://example.com/").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_budget_stops_crawl() {
        // A chain of five pages; budget of two
        let site = Arc::new(FakeSite::new(vec![
            page("https://example.com/", &["https://example.com/1"]),
            page("https://example.com/1", &["https://example.com/2"]),
            page("https://example.com/2", &["https://example.com/3"]),
            page("https://example.com/3", &["https://example.com/4"]),
            page("https://example.com/4", &[]),
        ]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 2)
            .await
            .unwrap();

        assert_eq!(pages, 2);
        assert_eq!(
            site.fetched(),
            vec!["https://example.com/", "https://example.com/1"]
        );
    }

    #[tokio::test]
    async fn test_only_same_domain_links_enqueued() {
        let site = Arc::new(FakeSite::new(vec![
            page(
                "https://example.com/",
                &["https://example.com/a", "https://other.com/b"],
            ),
            page("https://example.com/a", &[]),
        ]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        assert_eq!(pages, 2);
        assert!(!site
            .fetched()
            .iter()
            .any(|url| url.contains("other.com")));
    }

    #[tokio::test]
    async fn test_url_visited_at_most_once() {
        // Both child pages link to /shared
        let site = Arc::new(FakeSite::new(vec![
            page(
                "https://example.com/",
                &["https://example.com/a", "https://example.com/b"],
            ),
            page("https://example.com/a", &["https://example.com/shared"]),
            page("https://example.com/b", &["https://example.com/shared"]),
            page("https://example.com/shared", &[]),
        ]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        assert_eq!(pages, 4);
        let shared_fetches = site
            .fetched()
            .iter()
            .filter(|url| url.ends_with("/shared"))
            .count();
        assert_eq!(shared_fetches, 1);
    }

    #[tokio::test]
    async fn test_fragment_variants_collapse() {
        let site = Arc::new(FakeSite::new(vec![
            page(
                "https://example.com/",
                &[
                    "https://example.com/page#intro",
                    "https://example.com/page#specs",
                ],
            ),
            page("https://example.com/page", &[]),
        ]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        assert_eq!(pages, 2);
        assert_eq!(site.fetched().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_contained() {
        // Seed links to a page the fake site does not serve
        let site = Arc::new(FakeSite::new(vec![page(
            "https://example.com/",
            &["https://example.com/missing", "https://example.com/ok"],
        ), page("https://example.com/ok", &[])]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        // The missing page is skipped; the crawl carries on
        assert_eq!(pages, 2);
        assert_eq!(site.fetched().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_page_still_contributes_links() {
        let site = Arc::new(FakeSite::new(vec![
            empty_page("https://example.com/", &["https://example.com/a"]),
            page("https://example.com/a", &[]),
        ]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        // Seed had no content but its link was followed
        assert_eq!(pages, 1);
        assert_eq!(site.fetched().len(), 2);
    }

    #[tokio::test]
    async fn test_fresh_url_skipped_without_fetch() {
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());
        store
            .replace_chunks(
                "https://example.com/",
                "Seed",
                &["previously indexed".to_string()],
                &[vec![1.0; EMBEDDING_DIM]],
            )
            .unwrap();

        let site = Arc::new(FakeSite::new(vec![page("https://example.com/", &[])]));
        let pages = crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        assert_eq!(pages, 0);
        assert!(site.fetched().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_seed_url_is_an_error() {
        let site = Arc::new(FakeSite::new(vec![]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        let result = crawler(site, store).crawl("not a url", 10).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_discovery_order_is_breadth_first() {
        let site = Arc::new(FakeSite::new(vec![
            page(
                "https://example.com/",
                &["https://example.com/a", "https://example.com/b"],
            ),
            page("https://example.com/a", &["https://example.com/a1"]),
            page("https://example.com/b", &[]),
            page("https://example.com/a1", &[]),
        ]));
        let store = Arc::new(SqliteContentStore::new_in_memory().unwrap());

        crawler(site.clone(), store)
            .crawl("https://example.com/", 10)
            .await
            .unwrap();

        // /b (depth 1) is fetched before /a1 (depth 2)
        assert_eq!(
            site.fetched(),
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/a1",
            ]
        );
    }
}
