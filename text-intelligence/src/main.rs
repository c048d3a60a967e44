//! Analyze posts read from stdin, one per line
//!
//! Usage: `text-intelligence [AUTHOR_ID] < posts.txt`
//!
//! Prints one JSON analysis record per post on stdout and a summary on the
//! log. Configuration comes from `TEXT_INTEL_CONFIG` (optional TOML file) and
//! `TEXT_INTEL__*` environment variables.

use anyhow::{Context, Result};
use std::sync::Arc;
use text_intelligence::{
    load_layered, HuggingFaceClassifier, HuggingFaceRecognizer, PostInput, SentimentStats,
    TextIntelligenceService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const TOP_TICKERS: usize = 10;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let author_id: i64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().with_context(|| format!("invalid author id {:?}", arg))?,
        None => 0,
    };

    let config_path = std::env::var("TEXT_INTEL_CONFIG").ok();
    let config = load_layered(config_path.as_deref())?;

    // Models must be reachable before any post is read
    let classifier = HuggingFaceClassifier::connect(&config)
        .await
        .context("failed to initialize sentiment classifier")?;
    let recognizer = HuggingFaceRecognizer::connect(&config)
        .await
        .context("failed to initialize entity recognizer")?;

    let service = TextIntelligenceService::with_config(
        Arc::new(classifier),
        Arc::new(recognizer),
        config.pipeline(),
    );

    let mut posts = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no: i64 = 0;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        posts.push(PostInput {
            author_id,
            post_id: line_no,
            text: text.to_string(),
        });
    }

    info!(posts = posts.len(), author_id, "Analyzing posts");

    let records = service.analyze_posts(&posts).await;
    for record in &records {
        println!("{}", serde_json::to_string(record)?);
    }

    let stats = SentimentStats::from_records(&records, TOP_TICKERS);
    info!(
        total = stats.total_posts,
        positive = stats.positive_count,
        negative = stats.negative_count,
        neutral = stats.neutral_count,
        failed = stats.failed_count,
        average = stats.average_sentiment,
        top_tickers = ?stats.top_tickers.iter().map(|t| format!("{}:{}", t.ticker, t.count)).collect::<Vec<_>>(),
        "Analysis complete"
    );

    Ok(())
}
