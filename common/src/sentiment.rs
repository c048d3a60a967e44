//! Sentiment result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores strictly above this are positive
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Scores strictly below this are negative
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Three-way sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Re-quantize a normalized score into a label.
    ///
    /// The boundaries are exclusive: exactly ±0.1 is neutral.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw output of a text classifier, before normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClassification {
    pub label: String,
    pub score: f64, // 0.0 to 1.0
}

impl RawClassification {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Normalized sentiment judgment for a single text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,      // -1.0 (very negative) to 1.0 (very positive)
    pub label: SentimentLabel,
    pub confidence: f64, // 0.0 to 1.0
    pub model: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawClassification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    /// Neutral result substituted when classification fails
    pub fn fallback(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            model: model.into(),
            timestamp: Utc::now(),
            raw: None,
            error: Some(error.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}
