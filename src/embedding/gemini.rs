//! Gemini batch-embedding provider

use crate::config::EmbeddingConfig;
use crate::embedding::{EmbeddingProvider, ProviderError};
use crate::storage::EMBEDDING_DIM;
use crate::ConfigError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client for the Gemini `batchEmbedContents` endpoint
pub struct GeminiEmbeddings {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiEmbeddings {
    /// Builds a client for the given endpoint, model, and API key
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let endpoint = format!(
            "{}/v1beta/models/{}:batchEmbedContents?key={}",
            base_url.trim_end_matches('/'),
            model,
            api_key
        );

        Ok(Self {
            client,
            endpoint,
            model: format!("models/{}", model),
        })
    }

    /// Builds a client from configuration, reading the API key from the
    /// environment variable the config names
    pub fn from_config(config: &EmbeddingConfig) -> crate::Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            ConfigError::Validation(format!(
                "Environment variable {} is not set",
                config.api_key_env
            ))
        })?;

        let client = Self::new(&config.base_url, &config.model, &api_key)
            .map_err(|e| ConfigError::Validation(format!("Failed to build HTTP client: {}", e)))?;
        Ok(client)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddings {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: &self.model,
                    content: Content {
                        parts: vec![Part { text }],
                    },
                })
                .collect(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(ProviderError(format!("HTTP {}: {}", status, body)));
        }

        let parsed: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| ProviderError(format!("Failed to parse embedding response: {}", e)))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(ProviderError(format!(
                "Provider returned {} embeddings for {} inputs",
                parsed.embeddings.len(),
                texts.len()
            )));
        }
        for embedding in &parsed.embeddings {
            if embedding.values.len() != EMBEDDING_DIM {
                return Err(ProviderError(format!(
                    "Expected {}-dimension embedding, got {}",
                    EMBEDDING_DIM,
                    embedding.values.len()
                )));
            }
        }

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}
