pub mod fetcher;
pub mod generator;
pub mod parser;
pub mod pipeline;
pub mod preprocessor;
pub mod reranker;
pub mod splitter;

pub use fetcher::{ContentFetcher, DocumentSource};
pub use generator::{build_prompt, AnswerGenerator, GroqGenerator};
pub use parser::HtmlParser;
pub use pipeline::{KnowledgeBase, Pipeline};
pub use preprocessor::TextPreprocessor;
pub use reranker::{CohereReranker, RankResult, Reranker};
pub use splitter::DocumentSplitter;
