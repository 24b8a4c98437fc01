//! # Web Search RAG
//!
//! A small retrieval-augmented-generation pipeline: fetch web pages, regroup
//! their text into chunks, rerank the chunks against a query with a remote
//! ranking service, and answer the query from the best chunks with a remote
//! chat model.
//!
//! ## Example Usage
//!
//! ```no_run
//! use web_search_rag::{KnowledgeBase, RagConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RagConfig::new("cohere-key", "rerank-english-v3.0", "groq-key", "llama3-8b-8192");
//!     let kb = KnowledgeBase::from_config(&config)?;
//!
//!     let mut session = Session::new();
//!     session.add_url("https://en.wikipedia.org/wiki/Rust_(programming_language)")?;
//!
//!     let answer = kb.answer(&session, "When was Rust first released?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use config::RagConfig;
pub use error::{FetchError, GenerateError, RagError, RankError, Result};
pub use services::{
    AnswerGenerator, CohereReranker, ContentFetcher, DocumentSource, DocumentSplitter,
    GroqGenerator, HtmlParser, KnowledgeBase, Pipeline, RankResult, Reranker, TextPreprocessor,
};
pub use types::{
    Answer, Chunk, FetchReport, ProcessedCorpus, RankedChunk, RankedContext, Session, SourceUrl,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
