use crate::error::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Separator appended after every sentence group and used to split chunks.
pub const CHUNK_SEPARATOR: &str = "\n\n\n";

/// Suffix written after each chunk of a ranked context.
pub const CONTEXT_SEPARATOR: &str = "\n=======================\n";

/// Phrase the model is told to emit when the context cannot answer the question.
pub const SENTINEL_ANSWER: &str = "I DONT KNOW";

/// What callers see when the generation service fails.
pub const SERVER_ERROR: &str = "Server error";

/// One web page to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUrl(String);

impl SourceUrl {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RagError::InvalidUrl {
                reason: "Please enter a URL before adding.".to_string(),
            });
        }

        let parsed = Url::parse(trimmed).map_err(|e| RagError::InvalidUrl {
            reason: format!("{}: {}", trimmed, e),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self(trimmed.to_string())),
            other => Err(RagError::InvalidUrl {
                reason: format!("unsupported scheme '{}' in {}", other, trimmed),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-owned list of source URLs. Append-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    urls: Vec<SourceUrl>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_url(&mut self, input: &str) -> Result<&SourceUrl> {
        let url = SourceUrl::parse(input)?;
        self.urls.push(url);
        Ok(&self.urls[self.urls.len() - 1])
    }

    pub fn urls(&self) -> &[SourceUrl] {
        &self.urls
    }

    pub fn latest(&self) -> Option<&SourceUrl> {
        self.urls.last()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }
}

/// A bounded fragment of normalized text, the unit of ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub text: String,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Outcome of fetching one source URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchReport {
    pub url: String,
    pub fetched_at: String,
    pub chars: usize,
    pub error: Option<String>,
}

impl FetchReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Chunks produced from a session's URLs, ready to be queried.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedCorpus {
    pub reports: Vec<FetchReport>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChunk {
    pub index: usize,
    pub score: f64,
    pub text: String,
}

/// Top-ranked chunks in descending relevance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedContext {
    pub chunks: Vec<RankedChunk>,
}

impl RankedContext {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.chunks.iter().map(|c| c.index).collect()
    }

    /// Context text as embedded into the generation prompt.
    pub fn render(&self) -> String {
        self.chunks
            .iter()
            .map(|c| format!("{}{}", c.text, CONTEXT_SEPARATOR))
            .collect()
    }
}

impl fmt::Display for RankedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Answer {
    Generated(String),
    /// The model reported the context was insufficient.
    Unknown,
    ServerError { status: Option<u16>, reason: String },
}

impl Answer {
    pub fn from_model_output(content: String) -> Self {
        let stripped = content
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
            .trim();
        if stripped.eq_ignore_ascii_case(SENTINEL_ANSWER) {
            Answer::Unknown
        } else {
            Answer::Generated(content)
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Answer::ServerError { .. })
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Generated(text) => f.write_str(text),
            Answer::Unknown => f.write_str(SENTINEL_ANSWER),
            Answer::ServerError { .. } => f.write_str(SERVER_ERROR),
        }
    }
}
