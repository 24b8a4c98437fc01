use thiserror::Error;

/// Failure while retrieving a source page. Non-fatal to the pipeline.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Error fetching page: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error fetching page: HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },
}

/// Failure of the remote ranking service. Fatal to the pipeline.
#[derive(Error, Debug)]
pub enum RankError {
    #[error("Rerank request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rerank service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rerank service returned index {index} for {len} documents")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failure of the remote generation service.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Generation service returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Malformed generation response: {reason}")]
    MalformedResponse { reason: String },
}

#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("Please add at least one URL before processing.")]
    EmptySession,

    #[error("Please enter a query before submitting.")]
    EmptyQuery,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Rank(#[from] RankError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RagError>;
