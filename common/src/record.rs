//! Per-post analysis record

use crate::entities::EntityBundle;
use crate::sentiment::{SentimentLabel, SentimentResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Sentiment and entities for one post, keyed by author and post.
///
/// This is the unit handed to persistence. Either stage may have failed; the
/// failing stage carries its fallback value plus a diagnostic in
/// `sentiment_error` / `entities_error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_id: Uuid,
    pub author_id: i64,
    pub post_id: i64,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub confidence_score: f64,
    pub mentioned_stocks: BTreeSet<String>,
    pub mentioned_companies: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub persons: BTreeSet<String>,
    pub model_used: String,
    pub ner_model_used: String,
    pub analysis_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities_error: Option<String>,
}

impl AnalysisRecord {
    /// Merge the two stage outputs into a record stamped with the current time
    pub fn compose(
        author_id: i64,
        post_id: i64,
        sentiment: SentimentResult,
        entities: EntityBundle,
        entities_error: Option<String>,
        ner_model: impl Into<String>,
    ) -> Self {
        Self {
            analysis_id: Uuid::new_v4(),
            author_id,
            post_id,
            sentiment_score: sentiment.score,
            sentiment_label: sentiment.label,
            confidence_score: sentiment.confidence,
            mentioned_stocks: entities.tickers,
            mentioned_companies: entities.companies,
            locations: entities.locations,
            persons: entities.persons,
            model_used: sentiment.model,
            ner_model_used: ner_model.into(),
            analysis_timestamp: Utc::now(),
            sentiment_error: sentiment.error,
            entities_error,
        }
    }

    /// True when neither stage fell back
    pub fn is_complete(&self) -> bool {
        self.sentiment_error.is_none() && self.entities_error.is_none()
    }

    pub fn entities(&self) -> EntityBundle {
        EntityBundle {
            companies: self.mentioned_companies.clone(),
            tickers: self.mentioned_stocks.clone(),
            locations: self.locations.clone(),
            persons: self.persons.clone(),
        }
    }
}
