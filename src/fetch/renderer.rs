//! HTTP client for the rendering service

use crate::fetch::{FetchError, FetchedPage, PageFetcher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Client for a rendering sidecar that fetches, renders, and converts pages
/// to markdown on our behalf
pub struct RendererClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RendererClient {
    /// Builds a client for the rendering service at `base_url`
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        // Rendering runs a real browser; allow it a generous deadline
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(90))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let endpoint = format!("{}/render", base_url.trim_end_matches('/'));

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PageFetcher for RendererClient {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let request = RenderRequest { url: url.as_str() };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let rendered: RenderResponse =
            response.json().await.map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        if !rendered.success {
            return Err(FetchError::Unsuccessful {
                url: url.to_string(),
            });
        }

        Ok(FetchedPage {
            url: url.clone(),
            title: rendered
                .metadata
                .title
                .filter(|title| !title.trim().is_empty()),
            fit_markdown: rendered.markdown.fit_markdown,
            raw_markdown: rendered.markdown.raw_markdown,
            internal_links: rendered
                .links
                .internal
                .into_iter()
                .map(|link| link.href)
                .filter(|href| !href.is_empty())
                .collect(),
        })
    }
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    links: RenderLinks,
    #[serde(default)]
    markdown: RenderMarkdown,
    #[serde(default)]
    metadata: RenderMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct RenderLinks {
    #[serde(default)]
    internal: Vec<RenderLink>,
}

#[derive(Debug, Deserialize)]
struct RenderLink {
    #[serde(default)]
    href: String,
}

#[derive(Debug, Default, Deserialize)]
struct RenderMarkdown {
    #[serde(default)]
    fit_markdown: String,
    #[serde(default)]
    raw_markdown: String,
}

#[derive(Debug, Default, Deserialize)]
struct RenderMetadata {
    title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let body = r##"{
            "success": true,
            "links": {"internal": [{"href": "https://example.com/a"}, {"href": ""}]},
            "markdown": {"fit_markdown": "# Pruned", "raw_markdown": "# Raw"},
            "metadata": {"title": "Example"}
        }"##;

        let parsed: RenderResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.links.internal.len(), 2);
        assert_eq!(parsed.markdown.fit_markdown, "# Pruned");
        assert_eq!(parsed.metadata.title.as_deref(), Some("Example"));
    }

    #[test]
    fn test_missing_fields_default() {
        let parsed: RenderResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.links.internal.is_empty());
        assert!(parsed.markdown.fit_markdown.is_empty());
        assert!(parsed.metadata.title.is_none());
    }

    #[test]
    fn test_endpoint_construction() {
        let client = RendererClient::new("http://localhost:11235/").unwrap();
        assert_eq!(client.endpoint, "http://localhost:11235/render");
    }
}
