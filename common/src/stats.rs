//! Aggregate sentiment statistics over analysis records

use crate::record::AnalysisRecord;
use crate::sentiment::SentimentLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How often a ticker was mentioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMention {
    pub ticker: String,
    pub count: u32,
}

/// Summary of a set of analyzed posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub total_posts: u32,
    pub positive_count: u32,
    pub negative_count: u32,
    pub neutral_count: u32,
    /// Posts whose sentiment stage fell back
    pub failed_count: u32,
    pub average_sentiment: f64,
    pub top_tickers: Vec<TickerMention>,
}

/// Counts saturate at `u32::MAX` instead of wrapping
fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl SentimentStats {
    /// Summarize records, keeping at most `ticker_limit` tickers.
    ///
    /// Records whose sentiment stage failed count toward `total_posts` and
    /// `failed_count` only; their neutral fallback would otherwise drag the
    /// average toward zero.
    pub fn from_records(records: &[AnalysisRecord], ticker_limit: usize) -> Self {
        let mut stats = Self {
            total_posts: saturating_count(records.len()),
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            failed_count: 0,
            average_sentiment: 0.0,
            top_tickers: Vec::new(),
        };

        let mut score_sum = 0.0;
        let mut ticker_counts: HashMap<&str, u32> = HashMap::new();

        for record in records {
            for ticker in &record.mentioned_stocks {
                let count = ticker_counts.entry(ticker.as_str()).or_insert(0);
                *count = count.saturating_add(1);
            }

            if record.sentiment_error.is_some() {
                stats.failed_count = stats.failed_count.saturating_add(1);
                continue;
            }

            score_sum += record.sentiment_score;
            match record.sentiment_label {
                SentimentLabel::Positive => stats.positive_count = stats.positive_count.saturating_add(1),
                SentimentLabel::Negative => stats.negative_count = stats.negative_count.saturating_add(1),
                SentimentLabel::Neutral => stats.neutral_count = stats.neutral_count.saturating_add(1),
            }
        }

        let scored = records.len() - stats.failed_count as usize;
        if scored > 0 {
            stats.average_sentiment = score_sum / scored as f64;
        }

        let mut tickers: Vec<TickerMention> = ticker_counts
            .into_iter()
            .map(|(ticker, count)| TickerMention {
                ticker: ticker.to_string(),
                count,
            })
            .collect();
        tickers.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ticker.cmp(&b.ticker)));
        tickers.truncate(ticker_limit);
        stats.top_tickers = tickers;

        stats
    }
}
