use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use web_search_rag::config::{
    DEFAULT_CHUNK_SIZE, DEFAULT_CONTENT_SELECTOR, DEFAULT_GENERATION_ENDPOINT,
    DEFAULT_RERANK_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_TOP_N,
};
use web_search_rag::RagConfig;

#[derive(Parser)]
#[command(name = "web-rag")]
#[command(about = "Answer questions about web pages with fetch, rerank and generate")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub settings: Settings,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and chunk URLs, printing the chunks
    Process(ProcessArgs),

    /// Answer a question from the given URLs
    Ask(AskArgs),

    /// Print the paragraph text extracted from one URL
    Fetch(FetchArgs),
}

#[derive(Args)]
pub struct Settings {
    /// Rerank service API key
    #[arg(long, env = "COHERE_API_KEY", global = true, hide_env_values = true, default_value = "")]
    pub rerank_api_key: String,

    /// Rerank model identifier
    #[arg(long, env = "COHERE_MODEL", global = true, default_value = "")]
    pub rerank_model: String,

    /// Generation service API key
    #[arg(long, env = "GROQ_API_KEY", global = true, hide_env_values = true, default_value = "")]
    pub generation_api_key: String,

    /// Generation model identifier
    #[arg(long, env = "GROQ_MODEL", global = true, default_value = "")]
    pub generation_model: String,

    /// Rerank endpoint
    #[arg(long, global = true, default_value = DEFAULT_RERANK_ENDPOINT)]
    pub rerank_endpoint: String,

    /// Chat completions endpoint
    #[arg(long, global = true, default_value = DEFAULT_GENERATION_ENDPOINT)]
    pub generation_endpoint: String,

    /// Number of chunks kept as context
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Maximum chunk size in characters
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// CSS selector of the main content container
    #[arg(long, global = true, default_value = DEFAULT_CONTENT_SELECTOR)]
    pub content_selector: String,

    /// Timeout for every outbound request, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl Settings {
    pub fn to_config(&self) -> RagConfig {
        let mut config = RagConfig::new(
            self.rerank_api_key.clone(),
            self.rerank_model.clone(),
            self.generation_api_key.clone(),
            self.generation_model.clone(),
        );
        config.rerank_endpoint = self.rerank_endpoint.clone();
        config.generation_endpoint = self.generation_endpoint.clone();
        config.top_n = self.top_n;
        config.chunk_size = self.chunk_size;
        config.content_selector = self.content_selector.clone();
        config.request_timeout_secs = self.timeout;
        config
    }
}

#[derive(Args)]
pub struct ProcessArgs {
    /// URLs to fetch, in order
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Write the processed chunks to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,
}

#[derive(Args)]
pub struct AskArgs {
    /// URLs to fetch, in order
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Question to answer
    #[arg(short, long)]
    pub query: String,

    /// Print the reranked context before the answer
    #[arg(long)]
    pub show_context: bool,
}

#[derive(Args)]
pub struct FetchArgs {
    /// URL to fetch
    #[arg(value_name = "URL")]
    pub url: String,
}
