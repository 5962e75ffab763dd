use serde::Deserialize;

/// Main configuration structure for silt
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    pub embedding: EmbeddingConfig,
    pub relevance: RelevanceConfig,
    pub storage: StorageConfig,
}

/// Trigger-surface configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP trigger surface binds to
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Page budget applied when a scrape request carries none
    #[serde(rename = "default-max-pages", default = "default_max_pages")]
    pub default_max_pages: u32,

    /// Minimum hours before a previously indexed URL is re-fetched
    #[serde(rename = "cooldown-hours", default = "default_cooldown_hours")]
    pub cooldown_hours: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            default_max_pages: default_max_pages(),
            cooldown_hours: default_cooldown_hours(),
        }
    }
}

/// Rendering service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    /// Base URL of the rendering sidecar
    #[serde(rename = "base-url", default = "default_renderer_base_url")]
    pub base_url: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            base_url: default_renderer_base_url(),
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding API
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Embedding model identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Total attempts before a rate-limited batch is declared exhausted
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between rate-limited attempts, in seconds
    #[serde(rename = "retry-delay-secs", default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Environment variable holding the API key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Relevance filter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceConfig {
    /// Topical keywords; a chunk is kept only if at least one matches
    pub keywords: Vec<String>,
}

/// Content store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_max_pages() -> u32 {
    20
}

fn default_cooldown_hours() -> u32 {
    24
}

fn default_renderer_base_url() -> String {
    "http://localhost:11235".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-004".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_secs() -> u64 {
    10
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}
