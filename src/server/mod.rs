//! HTTP trigger surface
//!
//! Thin transport glue: a health probe and a fire-and-forget scrape trigger
//! that spawns one detached crawl job per seed URL. The response confirms
//! acceptance only; job outcomes surface exclusively through logs.

use crate::crawl::Crawler;
use crate::fetch::PageFetcher;
use crate::pipeline::PagePipeline;
use crate::storage::ContentStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub pipeline: Arc<PagePipeline>,
    pub store: Arc<dyn ContentStore>,
    pub default_max_pages: u32,
    pub cooldown_hours: u32,
}

impl AppState {
    /// Builds a crawl driver wired to this state's collaborators
    pub fn crawler(&self) -> Crawler {
        Crawler::new(
            self.fetcher.clone(),
            self.pipeline.clone(),
            self.store.clone(),
            self.cooldown_hours,
        )
    }
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/scrape", post(scrape_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves the trigger surface until the process exits
pub async fn serve(bind_address: &str, state: AppState) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!("Listening on {}", bind_address);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    store: StoreHealth,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint; probes the content store with a counting query
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.count_chunks() {
        Ok(chunks) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                store: StoreHealth {
                    status: "ok".to_string(),
                    chunks: Some(chunks),
                    error: None,
                },
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                store: StoreHealth {
                    status: "error".to_string(),
                    chunks: None,
                    error: Some(e.to_string()),
                },
            }),
        ),
    }
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub urls: Vec<String>,
    pub max_pages: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    message: String,
    urls: Vec<String>,
    max_pages: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Fire-and-forget scrape trigger
///
/// Validates the request, spawns one crawl job per seed URL, and responds
/// 202 immediately. There is no completion channel back to the caller.
async fn scrape_handler(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<(StatusCode, Json<ScrapeResponse>), (StatusCode, Json<ErrorResponse>)> {
    if request.urls.is_empty() {
        return Err(bad_request("urls cannot be empty"));
    }
    if request.max_pages == Some(0) {
        return Err(bad_request("max_pages must be a positive integer"));
    }

    let max_pages = request.max_pages.unwrap_or(state.default_max_pages);

    for url in &request.urls {
        let crawler = state.crawler();
        let url = url.clone();
        tokio::spawn(async move {
            match crawler.crawl(&url, max_pages).await {
                Ok(pages) => {
                    tracing::info!("Crawl of {} finished: {} pages indexed", url, pages)
                }
                Err(e) => tracing::error!("Crawl of {} failed to start: {}", url, e),
            }
        });
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(ScrapeResponse {
            message: "Crawl triggered".to_string(),
            urls: request.urls,
            max_pages,
        }),
    ))
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
