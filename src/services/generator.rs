use crate::config::RagConfig;
use crate::error::{GenerateError, RagError, Result};
use crate::types::{Answer, RankedContext, SENTINEL_ANSWER};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Builds the user prompt that pins the model to the supplied context.
pub fn build_prompt(context: &str, query: &str) -> String {
    format!(
        "Use the following CONTEXT to answer the QUESTION at the end.\n\
         If you don't know the answer, just say that \"{sentinel}\", don't try to make up an answer.\n\
         Also remember don't use any external knowledge and only refer to this CONTEXT to answer question.\n\
         Consider this CONTEXT as the ultimate truth.\n\
         \n\
         CONTEXT: {context}\n\
         QUESTION: {query}\n",
        sentinel = SENTINEL_ANSWER,
        context = context,
        query = query,
    )
}

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    /// Sends the prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerateError>;

    /// Generates an answer from the context. Service failures come back as
    /// [`Answer::ServerError`] rather than an error.
    async fn generate_answer(&self, context: &RankedContext, query: &str) -> Answer {
        let prompt = build_prompt(&context.render(), query);

        match self.complete(&prompt).await {
            Ok(content) => Answer::from_model_output(content),
            Err(e) => {
                error!("Generation failed: {}", e);
                let status = match &e {
                    GenerateError::HttpStatus { status } => Some(*status),
                    GenerateError::Http(inner) => inner.status().map(|s| s.as_u16()),
                    GenerateError::MalformedResponse { .. } => None,
                };
                Answer::ServerError {
                    status,
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn first_choice_content(response: ChatResponse) -> std::result::Result<String, GenerateError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| GenerateError::MalformedResponse {
            reason: "response contained no choices".to_string(),
        })
}

/// Client for an OpenAI-compatible chat completions endpoint (Groq by default).
pub struct GroqGenerator {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GroqGenerator {
    pub fn new(config: &RagConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| RagError::Config {
                reason: format!("Failed to build generation client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: config.generation_api_key.clone(),
            model: config.generation_model.clone(),
            endpoint: config.generation_endpoint.clone(),
        })
    }
}

#[async_trait]
impl AnswerGenerator for GroqGenerator {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, GenerateError> {
        info!("Requesting completion from model {}", self.model);

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!("Generation service returned HTTP {}", status.as_u16());
            return Err(GenerateError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| GenerateError::MalformedResponse {
                    reason: e.to_string(),
                })?;

        first_choice_content(parsed)
    }
}
