use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::services::fetcher::{ContentFetcher, DocumentSource};
use crate::services::generator::{AnswerGenerator, GroqGenerator};
use crate::services::preprocessor::TextPreprocessor;
use crate::services::reranker::{CohereReranker, Reranker};
use crate::services::splitter::DocumentSplitter;
use crate::types::{Answer, Chunk, FetchReport, ProcessedCorpus, RankedContext, Session, SourceUrl};
use tracing::{info, warn};

/// fetch -> preprocess -> split -> rerank -> generate.
///
/// Stateless apart from the read-only configuration captured at construction.
pub struct Pipeline<S, R, G> {
    source: S,
    reranker: R,
    generator: G,
    preprocessor: TextPreprocessor,
    splitter: DocumentSplitter,
    top_n: usize,
}

/// The production wiring: HTTP page fetcher, Cohere reranker, Groq generator.
pub type KnowledgeBase = Pipeline<ContentFetcher, CohereReranker, GroqGenerator>;

impl KnowledgeBase {
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        config.validate()?;
        Self::build(config)
    }

    /// Wires the services without checking credentials. Enough for
    /// [`Pipeline::process`], which never calls the remote APIs.
    pub fn build(config: &RagConfig) -> Result<Self> {
        Ok(Pipeline::new(
            ContentFetcher::new(config)?,
            CohereReranker::new(config)?,
            GroqGenerator::new(config)?,
            config,
        ))
    }
}

impl<S, R, G> Pipeline<S, R, G>
where
    S: DocumentSource,
    R: Reranker,
    G: AnswerGenerator,
{
    pub fn new(source: S, reranker: R, generator: G, config: &RagConfig) -> Self {
        Self {
            source,
            reranker,
            generator,
            preprocessor: TextPreprocessor::new(config.sentences_per_group),
            splitter: DocumentSplitter::new(config.chunk_size),
            top_n: config.top_n,
        }
    }

    /// Fetches every URL in order and concatenates the texts with no separator.
    /// A failed fetch contributes nothing and is recorded in its report.
    pub async fn fetch_all(&self, urls: &[SourceUrl]) -> (String, Vec<FetchReport>) {
        let mut combined = String::new();
        let mut reports = Vec::with_capacity(urls.len());

        for (idx, url) in urls.iter().enumerate() {
            info!("Processing source {}/{}: {}", idx + 1, urls.len(), url);
            let fetched_at = chrono::Utc::now().to_rfc3339();

            match self.source.fetch_text(url.as_str()).await {
                Ok(text) => {
                    reports.push(FetchReport {
                        url: url.to_string(),
                        fetched_at,
                        chars: text.chars().count(),
                        error: None,
                    });
                    combined.push_str(&text);
                }
                Err(e) => {
                    warn!("Failed to fetch content from {}: {}", url, e);
                    reports.push(FetchReport {
                        url: url.to_string(),
                        fetched_at,
                        chars: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        (combined, reports)
    }

    pub fn chunk_text(&self, text: &str) -> Vec<Chunk> {
        let normalized = self.preprocessor.preprocess(text);
        self.splitter.create_chunks(&normalized)
    }

    pub async fn process(&self, session: &Session) -> Result<ProcessedCorpus> {
        if session.is_empty() {
            return Err(RagError::EmptySession);
        }

        let (text, reports) = self.fetch_all(session.urls()).await;
        let chunks = self.chunk_text(&text);

        info!(
            "Processed {} URLs into {} chunks",
            session.len(),
            chunks.len()
        );

        Ok(ProcessedCorpus { reports, chunks })
    }

    /// Rank failures abort the invocation.
    pub async fn rerank(&self, query: &str, chunks: &[Chunk]) -> Result<RankedContext> {
        let context = self
            .reranker
            .rerank_documents(query, chunks, self.top_n)
            .await?;

        info!("Selected chunks {:?} as context", context.indices());
        Ok(context)
    }

    pub async fn ask(&self, corpus: &ProcessedCorpus, query: &str) -> Result<Answer> {
        let query = Self::require_query(query)?;

        let context = self.rerank(query, &corpus.chunks).await?;
        Ok(self.generate(&context, query).await)
    }

    pub async fn generate(&self, context: &RankedContext, query: &str) -> Answer {
        self.generator.generate_answer(context, query).await
    }

    pub async fn answer(&self, session: &Session, query: &str) -> Result<Answer> {
        Self::require_query(query)?;

        let corpus = self.process(session).await?;
        self.ask(&corpus, query).await
    }

    /// Single-URL convenience over [`Pipeline::answer`].
    pub async fn answer_query(&self, url: &str, query: &str) -> Result<Answer> {
        let mut session = Session::new();
        session.add_url(url)?;
        self.answer(&session, query).await
    }

    fn require_query(query: &str) -> Result<&str> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            Err(RagError::EmptyQuery)
        } else {
            Ok(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, GenerateError, RankError};
    use crate::services::reranker::RankResult;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct StaticPages(HashMap<String, String>);

    #[async_trait]
    impl DocumentSource for StaticPages {
        async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchError> {
            self.0.get(url).cloned().ok_or(FetchError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    /// Picks chunks containing the most query words.
    struct OverlapReranker;

    #[async_trait]
    impl Reranker for OverlapReranker {
        async fn rank(
            &self,
            query: &str,
            documents: &[String],
            top_n: usize,
        ) -> std::result::Result<Vec<RankResult>, RankError> {
            let mut scored: Vec<RankResult> = documents
                .iter()
                .enumerate()
                .map(|(index, doc)| RankResult {
                    index,
                    relevance_score: query
                        .split_whitespace()
                        .filter(|w| doc.contains(*w))
                        .count() as f64,
                })
                .collect();
            scored.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
            scored.truncate(top_n);
            Ok(scored)
        }
    }

    struct BrokenReranker;

    #[async_trait]
    impl Reranker for BrokenReranker {
        async fn rank(
            &self,
            _query: &str,
            _documents: &[String],
            _top_n: usize,
        ) -> std::result::Result<Vec<RankResult>, RankError> {
            Err(RankError::HttpStatus { status: 401, body: "invalid api token".to_string() })
        }
    }

    /// Records every prompt it receives.
    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnswerGenerator for RecordingGenerator {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerateError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("answer from context".to_string())
        }
    }

    struct OfflineGenerator;

    #[async_trait]
    impl AnswerGenerator for OfflineGenerator {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, GenerateError> {
            Err(GenerateError::HttpStatus { status: 502 })
        }
    }

    fn config() -> RagConfig {
        RagConfig::new("a", "b", "c", "d")
    }

    fn pages() -> StaticPages {
        let mut map = HashMap::new();
        map.insert(
            "https://example.com/one".to_string(),
            "Alpha starts here. Alpha continues. Alpha ends".to_string(),
        );
        map.insert(
            "https://example.com/two".to_string(),
            ". Rust was first released in 2015. Bravo is unrelated".to_string(),
        );
        StaticPages(map)
    }

    fn session(urls: &[&str]) -> Session {
        let mut session = Session::new();
        for url in urls {
            session.add_url(url).unwrap();
        }
        session
    }

    #[tokio::test]
    async fn test_fetch_all_concatenates_in_order_and_skips_failures() {
        let pipeline = Pipeline::new(pages(), OverlapReranker, OfflineGenerator, &config());
        let s = session(&[
            "https://example.com/two",
            "https://example.com/missing",
            "https://example.com/one",
        ]);

        let (text, reports) = pipeline.fetch_all(s.urls()).await;

        assert_eq!(
            text,
            ". Rust was first released in 2015. Bravo is unrelatedAlpha starts here. Alpha continues. Alpha ends"
        );
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_success());
        assert!(!reports[1].is_success());
        assert!(reports[1].error.as_deref().unwrap().contains("404"));
        assert_eq!(reports[2].url, "https://example.com/one");
    }

    #[tokio::test]
    async fn test_answer_runs_all_stages() {
        let generator = RecordingGenerator::default();
        let pipeline = Pipeline::new(pages(), OverlapReranker, generator, &config());
        let s = session(&["https://example.com/one", "https://example.com/two"]);

        let answer = pipeline
            .answer(&s, "When was Rust first released?")
            .await
            .unwrap();
        assert_eq!(answer, Answer::Generated("answer from context".to_string()));

        let prompts = pipeline.generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Rust was first released in 2015"));
        assert!(prompts[0].contains("QUESTION: When was Rust first released?"));
        assert!(prompts[0].matches("=======================").count() <= 2);
    }

    #[tokio::test]
    async fn test_rank_failure_aborts() {
        let pipeline = Pipeline::new(pages(), BrokenReranker, RecordingGenerator::default(), &config());
        let s = session(&["https://example.com/one"]);

        let err = pipeline.answer(&s, "anything").await.unwrap_err();
        assert!(matches!(err, RagError::Rank(RankError::HttpStatus { status: 401, .. })));
        assert!(pipeline.generator.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_is_returned_as_answer() {
        let pipeline = Pipeline::new(pages(), OverlapReranker, OfflineGenerator, &config());
        let s = session(&["https://example.com/one"]);

        let answer = pipeline.answer(&s, "Alpha?").await.unwrap();
        assert_eq!(answer.to_string(), "Server error");
    }

    #[tokio::test]
    async fn test_empty_session_and_query_rejected() {
        let pipeline = Pipeline::new(pages(), OverlapReranker, OfflineGenerator, &config());

        let err = pipeline.process(&Session::new()).await.unwrap_err();
        assert!(matches!(err, RagError::EmptySession));

        let s = session(&["https://example.com/one"]);
        let err = pipeline.answer(&s, "   ").await.unwrap_err();
        assert!(matches!(err, RagError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_all_fetches_failing_still_generates() {
        let generator = RecordingGenerator::default();
        let pipeline = Pipeline::new(pages(), BrokenReranker, generator, &config());
        let s = session(&["https://example.com/missing"]);

        // No chunks means the ranking service is never called.
        let corpus = pipeline.process(&s).await.unwrap();
        assert!(corpus.chunks.is_empty());

        let answer = pipeline.ask(&corpus, "q").await.unwrap();
        assert!(matches!(answer, Answer::Generated(_)));
    }

    #[tokio::test]
    async fn test_answer_query_single_url() {
        let pipeline = Pipeline::new(pages(), OverlapReranker, RecordingGenerator::default(), &config());

        let answer = pipeline
            .answer_query("https://example.com/two", "Rust released")
            .await
            .unwrap();
        assert!(matches!(answer, Answer::Generated(_)));

        let err = pipeline.answer_query("", "q").await.unwrap_err();
        assert!(matches!(err, RagError::InvalidUrl { .. }));
    }

    #[test]
    fn test_from_config_validates_first() {
        let bad = RagConfig::new("", "b", "c", "d");
        assert!(matches!(KnowledgeBase::from_config(&bad), Err(RagError::Config { .. })));
        assert!(KnowledgeBase::from_config(&config()).is_ok());
    }
}
