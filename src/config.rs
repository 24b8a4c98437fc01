use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_RERANK_ENDPOINT: &str = "https://api.cohere.ai/v1/rerank";
pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_CONTENT_SELECTOR: &str = "#mw-content-text";
pub const DEFAULT_TOP_N: usize = 2;
pub const DEFAULT_CHUNK_SIZE: usize = 200;
pub const DEFAULT_SENTENCES_PER_GROUP: usize = 3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Read-only settings resolved once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    pub rerank_api_key: String,
    pub rerank_model: String,
    pub generation_api_key: String,
    pub generation_model: String,

    #[serde(default = "default_rerank_endpoint")]
    pub rerank_endpoint: String,
    #[serde(default = "default_generation_endpoint")]
    pub generation_endpoint: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Maximum chunk length in chars.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_sentences_per_group")]
    pub sentences_per_group: usize,
    #[serde(default = "default_content_selector")]
    pub content_selector: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_rerank_endpoint() -> String {
    DEFAULT_RERANK_ENDPOINT.to_string()
}

fn default_generation_endpoint() -> String {
    DEFAULT_GENERATION_ENDPOINT.to_string()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_sentences_per_group() -> usize {
    DEFAULT_SENTENCES_PER_GROUP
}

fn default_content_selector() -> String {
    DEFAULT_CONTENT_SELECTOR.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RagConfig {
    /// Builds a config with default tunables. Call [`RagConfig::validate`] before use.
    pub fn new(
        rerank_api_key: impl Into<String>,
        rerank_model: impl Into<String>,
        generation_api_key: impl Into<String>,
        generation_model: impl Into<String>,
    ) -> Self {
        Self {
            rerank_api_key: rerank_api_key.into(),
            rerank_model: rerank_model.into(),
            generation_api_key: generation_api_key.into(),
            generation_model: generation_model.into(),
            rerank_endpoint: default_rerank_endpoint(),
            generation_endpoint: default_generation_endpoint(),
            top_n: DEFAULT_TOP_N,
            chunk_size: DEFAULT_CHUNK_SIZE,
            sentences_per_group: DEFAULT_SENTENCES_PER_GROUP,
            content_selector: default_content_selector(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("rerank_api_key", &self.rerank_api_key),
            ("rerank_model", &self.rerank_model),
            ("generation_api_key", &self.generation_api_key),
            ("generation_model", &self.generation_model),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(RagError::Config {
                reason: format!("missing required values: {}", missing.join(", ")),
            });
        }

        for (name, value) in [
            ("top_n", self.top_n),
            ("chunk_size", self.chunk_size),
            ("sentences_per_group", self.sentences_per_group),
        ] {
            if value == 0 {
                return Err(RagError::Config {
                    reason: format!("{} must be greater than 0", name),
                });
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(RagError::Config {
                reason: "request_timeout_secs must be greater than 0".to_string(),
            });
        }

        for (name, endpoint) in [
            ("rerank_endpoint", &self.rerank_endpoint),
            ("generation_endpoint", &self.generation_endpoint),
        ] {
            Url::parse(endpoint).map_err(|e| RagError::Config {
                reason: format!("{} '{}' is not a valid URL: {}", name, endpoint, e),
            })?;
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RagConfig {
        RagConfig::new("co-key", "rerank-english-v3.0", "gq-key", "llama3-8b-8192")
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n, 2);
        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_fields_are_reported_together() {
        let config = RagConfig::new("", "model", " ", "model");
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("rerank_api_key"));
        assert!(err.contains("generation_api_key"));
        assert!(!err.contains("rerank_model"));
    }

    #[test]
    fn test_zero_tunables_rejected() {
        let mut config = sample();
        config.chunk_size = 0;
        assert!(matches!(config.validate(), Err(RagError::Config { .. })));

        let mut config = sample();
        config.top_n = 0;
        assert!(matches!(config.validate(), Err(RagError::Config { .. })));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = sample();
        config.generation_endpoint = "not a url".to_string();
        assert!(matches!(config.validate(), Err(RagError::Config { .. })));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{
            "rerank_api_key": "a",
            "rerank_model": "b",
            "generation_api_key": "c",
            "generation_model": "d"
        }"#;
        let config: RagConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rerank_endpoint, DEFAULT_RERANK_ENDPOINT);
        assert_eq!(config.content_selector, "#mw-content-text");
        assert!(config.validate().is_ok());
    }
}
