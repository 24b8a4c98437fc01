use crate::config::RagConfig;
use crate::error::{RagError, RankError, Result};
use crate::types::{Chunk, RankedChunk, RankedContext};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One entry of a ranking response: position in the input list and its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankResult {
    pub index: usize,
    pub relevance_score: f64,
}

#[async_trait]
pub trait Reranker: Send + Sync {
    /// Scores `documents` against `query`, returning at most `top_n` results
    /// in descending relevance order.
    async fn rank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> std::result::Result<Vec<RankResult>, RankError>;

    /// Ranks `chunks` and assembles the context from the selected texts.
    async fn rerank_documents(
        &self,
        query: &str,
        chunks: &[Chunk],
        top_n: usize,
    ) -> std::result::Result<RankedContext, RankError> {
        if chunks.is_empty() || top_n == 0 {
            debug!("Nothing to rerank");
            return Ok(RankedContext::default());
        }

        let top_n = top_n.min(chunks.len());
        let documents: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let results = self.rank(query, &documents, top_n).await?;

        build_context(chunks, &results, top_n)
    }
}

/// Maps ranking results back onto the original chunks, keeping the service's order.
pub fn build_context(
    chunks: &[Chunk],
    results: &[RankResult],
    top_n: usize,
) -> std::result::Result<RankedContext, RankError> {
    let mut selected = Vec::with_capacity(top_n.min(results.len()));

    for result in results.iter().take(top_n) {
        let chunk = chunks.get(result.index).ok_or(RankError::IndexOutOfRange {
            index: result.index,
            len: chunks.len(),
        })?;

        selected.push(RankedChunk {
            index: result.index,
            score: result.relevance_score,
            text: chunk.text.clone(),
        });
    }

    Ok(RankedContext { chunks: selected })
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RankResult>,
}

/// Client for a Cohere-compatible `/rerank` endpoint.
pub struct CohereReranker {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl CohereReranker {
    pub fn new(config: &RagConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RagError::Config {
                reason: format!("Failed to build rerank client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: config.rerank_api_key.clone(),
            model: config.rerank_model.clone(),
            endpoint: config.rerank_endpoint.clone(),
        })
    }
}

#[async_trait]
impl Reranker for CohereReranker {
    async fn rank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> std::result::Result<Vec<RankResult>, RankError> {
        info!(
            "Reranking {} documents with model {} (top_n={})",
            documents.len(),
            self.model,
            top_n
        );

        let body = RerankRequest {
            model: &self.model,
            query,
            documents,
            top_n,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RankError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: RerankResponse = response.json().await?;

        debug!("Rerank results: {:?}", parsed.results);
        Ok(parsed.results)
    }
}
