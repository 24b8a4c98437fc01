use crate::config::RagConfig;
use crate::error::{FetchError, RagError, Result};
use crate::services::parser::HtmlParser;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

/// Anything that can turn a URL into plain body text.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchError>;
}

pub struct ContentFetcher {
    client: Client,
    parser: HtmlParser,
}

impl ContentFetcher {
    pub fn new(config: &RagConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("web-search-rag/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RagError::Config {
                reason: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self::with_client(client, HtmlParser::new(&config.content_selector)?))
    }

    pub fn with_client(client: Client, parser: HtmlParser) -> Self {
        Self { client, parser }
    }

    async fn fetch_html(&self, url: &str) -> std::result::Result<String, FetchError> {
        Url::parse(url)?;

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl DocumentSource for ContentFetcher {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchError> {
        info!("Fetching content from URL: {}", url);

        let html = self.fetch_html(url).await?;
        let text = self.parser.extract_text(&html);

        if text.is_empty() {
            warn!("No paragraph text extracted from {}", url);
        } else {
            info!("Extracted {} chars from {}", text.chars().count(), url);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> ContentFetcher {
        let config = RagConfig::new("a", "b", "c", "d");
        ContentFetcher::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_url_is_fetch_error() {
        let result = fetcher().fetch_text("definitely not a url").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        // Port 9 (discard) is closed on loopback in test environments.
        let result = fetcher().fetch_text("http://127.0.0.1:9/wiki/Page").await;
        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(err.to_string().starts_with("Error fetching page"));
    }
}
