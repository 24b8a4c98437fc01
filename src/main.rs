mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{AskArgs, Cli, Commands, FetchArgs, ProcessArgs};
use tracing::{error, info, Level};
use web_search_rag::{ContentFetcher, DocumentSource, KnowledgeBase, RagConfig, RagError, Result, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = cli.settings.to_config();

    let result = match &cli.command {
        Commands::Process(args) => handle_process_command(args, &config).await,
        Commands::Ask(args) => handle_ask_command(args, &config).await,
        Commands::Fetch(args) => handle_fetch_command(args, &config).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn build_session(urls: &[String]) -> Result<Session> {
    let mut session = Session::new();
    for url in urls {
        session.add_url(url)?;
    }
    Ok(session)
}

async fn handle_process_command(args: &ProcessArgs, config: &RagConfig) -> Result<()> {
    let session = build_session(&args.urls)?;
    let kb = KnowledgeBase::build(config)?;

    info!("Processing {} URLs", session.len());
    let corpus = kb.process(&session).await?;

    for report in &corpus.reports {
        match &report.error {
            None => info!("  {} ({} chars)", report.url, report.chars),
            Some(e) => info!("  {} failed: {}", report.url, e),
        }
    }

    for chunk in &corpus.chunks {
        println!("--- chunk {} ({} chars) ---", chunk.index, chunk.char_len());
        println!("{}", chunk.text);
    }

    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&corpus)
            .context("Failed to serialize processed chunks")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON chunk file")?;

        info!("Chunks written to: {}", json_path.display());
    }

    Ok(())
}

async fn handle_ask_command(args: &AskArgs, config: &RagConfig) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(RagError::EmptyQuery);
    }

    let session = build_session(&args.urls)?;
    let kb = KnowledgeBase::from_config(config)?;

    let corpus = kb.process(&session).await?;
    info!("Answering over {} chunks", corpus.chunks.len());

    let context = kb.rerank(query, &corpus.chunks).await?;
    if args.show_context {
        println!("{}", context);
    }

    let answer = kb.generate(&context, query).await;
    if answer.is_server_error() {
        error!("Generation service failed: {:?}", answer);
    }

    println!("{}", answer);
    Ok(())
}

async fn handle_fetch_command(args: &FetchArgs, config: &RagConfig) -> Result<()> {
    let fetcher = ContentFetcher::new(config)?;
    let text = fetcher.fetch_text(&args.url).await?;

    println!("{}", text);
    Ok(())
}
