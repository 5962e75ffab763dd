//! Embedding generation with bounded retry under rate limits
//!
//! The provider seam is a trait so the retry policy can be exercised against
//! fakes; the production implementation is [`GeminiEmbeddings`].

mod gemini;

pub use gemini::GeminiEmbeddings;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Raw failure from an embedding provider, carried as message text
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ProviderError(pub String);

/// Errors surfaced by [`EmbeddingClient::embed`]
#[derive(Debug, Error)]
pub enum EmbedError {
    /// Non-retryable provider failure, propagated on first occurrence
    #[error("Embedding provider error: {0}")]
    Provider(ProviderError),

    /// Every attempt hit a rate limit; distinct from a provider error so the
    /// caller can tell exhaustion from a hard failure
    #[error("Embedding failed after {attempts} rate-limited attempts")]
    Exhausted { attempts: u32 },
}

/// A batch embedding capability: one vector per input text, same order
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Classifies a provider failure as a rate-limit condition
///
/// The provider exposes quota exhaustion only through its error message text,
/// so classification is a substring scan for the markers it is known to emit.
pub fn is_rate_limited(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["429", "rate", "quota", "resource"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Retrying wrapper around an [`EmbeddingProvider`]
///
/// Sends the full batch in one provider call per attempt. Rate-limited
/// attempts sleep a fixed delay and retry up to the attempt budget; any other
/// failure propagates immediately. The sleep suspends only the calling crawl
/// job.
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl EmbeddingClient {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        max_attempts: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            provider,
            max_attempts,
            retry_delay,
        }
    }

    /// Embeds a batch of texts, retrying rate-limited attempts
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        for attempt in 1..=self.max_attempts {
            match self.provider.embed_batch(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(error) if is_rate_limited(&error.to_string()) => {
                    tracing::warn!(
                        "Embedding rate limit hit (attempt {}/{}), retrying in {}s: {}",
                        attempt,
                        self.max_attempts,
                        self.retry_delay.as_secs(),
                        error
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(error) => return Err(EmbedError::Provider(error)),
            }
        }

        Err(EmbedError::Exhausted {
            attempts: self.max_attempts,
        })
    }
}
