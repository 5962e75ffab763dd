//! silt service entry point
//!
//! Command-line interface for the ingestion service: serve the HTTP trigger
//! surface (default), run a one-shot crawl, or report store statistics.

use anyhow::Context;
use clap::Parser;
use silt::config::Config;
use silt::embedding::{EmbeddingClient, GeminiEmbeddings};
use silt::fetch::RendererClient;
use silt::pipeline::PagePipeline;
use silt::relevance::RelevanceFilter;
use silt::server::AppState;
use silt::storage::SqliteContentStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// silt: web ingestion into an embedding-indexed content store
#[derive(Parser, Debug)]
#[command(name = "silt")]
#[command(version)]
#[command(about = "Crawl, chunk, embed, and index web content", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl a single seed URL synchronously instead of serving
    #[arg(long, value_name = "URL", conflicts_with = "stats")]
    ingest: Option<String>,

    /// Page budget for --ingest (defaults to the configured budget)
    #[arg(long, requires = "ingest")]
    max_pages: Option<u32>,

    /// Show content store statistics and exit
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = silt::config::load_config_with_hash(&cli.config)
        .context("failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.stats {
        return handle_stats(&config);
    }

    let state = build_state(&config)?;

    if let Some(url) = cli.ingest {
        return handle_ingest(&state, &url, cli.max_pages.unwrap_or(config.crawl.default_max_pages)).await;
    }

    silt::server::serve(&config.server.bind_address, state)
        .await
        .context("server failed")?;
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("silt=info,warn"),
            1 => EnvFilter::new("silt=debug,info"),
            2 => EnvFilter::new("silt=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Wires the collaborators the pipeline and crawl jobs depend on
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store = Arc::new(
        SqliteContentStore::new(Path::new(&config.storage.database_path))
            .context("failed to open content store")?,
    );

    let provider = Arc::new(
        GeminiEmbeddings::from_config(&config.embedding)
            .context("failed to build embedding client")?,
    );
    let embedder = EmbeddingClient::new(
        provider,
        config.embedding.max_attempts,
        Duration::from_secs(config.embedding.retry_delay_secs),
    );

    let filter = RelevanceFilter::new(&config.relevance.keywords)
        .context("invalid relevance keywords")?;

    let pipeline = Arc::new(PagePipeline::new(embedder, store.clone(), filter));

    let fetcher = Arc::new(
        RendererClient::new(&config.renderer.base_url)
            .context("failed to build renderer client")?,
    );

    Ok(AppState {
        fetcher,
        pipeline,
        store,
        default_max_pages: config.crawl.default_max_pages,
        cooldown_hours: config.crawl.cooldown_hours,
    })
}

/// Handles --ingest: one synchronous crawl from the command line
async fn handle_ingest(state: &AppState, url: &str, max_pages: u32) -> anyhow::Result<()> {
    let pages = state
        .crawler()
        .crawl(url, max_pages)
        .await
        .with_context(|| format!("crawl of {} failed", url))?;

    println!("Indexed {} pages from {}", pages, url);
    Ok(())
}

/// Handles --stats: reports what the content store currently holds
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use silt::storage::ContentStore;

    let store = SqliteContentStore::new(Path::new(&config.storage.database_path))
        .context("failed to open content store")?;

    println!("Database: {}\n", config.storage.database_path);
    println!("  Chunks stored: {}", store.count_chunks()?);
    println!("  Source URLs:   {}", store.count_sources()?);
    match store.latest_scraped_at()? {
        Some(timestamp) => println!("  Last indexed:  {}", timestamp.to_rfc3339()),
        None => println!("  Last indexed:  never"),
    }

    Ok(())
}
