use crate::config::types::{Config, CrawlConfig, EmbeddingConfig, RelevanceConfig, StorageConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server(&config.server.bind_address)?;
    validate_crawl(&config.crawl)?;
    validate_http_base_url("renderer base-url", &config.renderer.base_url)?;
    validate_embedding(&config.embedding)?;
    validate_relevance(&config.relevance)?;
    validate_storage(&config.storage)?;
    Ok(())
}

fn validate_server(bind_address: &str) -> Result<(), ConfigError> {
    bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!("Invalid bind-address '{}': {}", bind_address, e))
    })?;
    Ok(())
}

fn validate_crawl(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.default_max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "default-max-pages must be >= 1, got {}",
            config.default_max_pages
        )));
    }

    if config.cooldown_hours < 1 {
        return Err(ConfigError::Validation(format!(
            "cooldown-hours must be >= 1, got {}",
            config.cooldown_hours
        )));
    }

    Ok(())
}

fn validate_http_base_url(label: &str, base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", label, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must be HTTP(S), got scheme '{}'",
            label,
            url.scheme()
        )));
    }

    Ok(())
}

fn validate_embedding(config: &EmbeddingConfig) -> Result<(), ConfigError> {
    validate_http_base_url("embedding base-url", &config.base_url)?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation(
            "embedding model cannot be empty".to_string(),
        ));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api-key-env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_relevance(config: &RelevanceConfig) -> Result<(), ConfigError> {
    if config.keywords.is_empty() {
        return Err(ConfigError::Validation(
            "relevance keywords cannot be empty; an empty set would reject every chunk"
                .to_string(),
        ));
    }

    for keyword in &config.keywords {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "relevance keywords cannot contain blank entries".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_storage(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
