//! Sentiment analyzer and entity extractor
//!
//! Each wraps one model handle. The `try_*` methods surface inference errors;
//! the plain methods never fail and substitute the documented fallback
//! (neutral sentiment, empty entity buckets) instead.

use crate::entities::classify_entities;
use crate::error::InferenceError;
use crate::model::{EntityRecognizer, ModelInfo, TextClassifier};
use crate::normalizer::normalize;
use chrono::Utc;
use common::{EntityBundle, SentimentResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns text into a normalized [`SentimentResult`]
#[derive(Clone)]
pub struct SentimentAnalyzer {
    classifier: Arc<dyn TextClassifier>,
}

impl SentimentAnalyzer {
    pub fn new(classifier: Arc<dyn TextClassifier>) -> Self {
        Self { classifier }
    }

    pub fn model_id(&self) -> &str {
        self.classifier.model_id()
    }

    pub fn model_info(&self) -> ModelInfo {
        self.classifier.info()
    }

    /// Classify and normalize, surfacing any inference error
    pub async fn try_analyze(&self, text: &str) -> Result<SentimentResult, InferenceError> {
        let raw = self.classifier.classify(text).await?;
        let (score, label) = normalize(&raw)?;

        debug!(
            raw_label = %raw.label,
            raw_score = raw.score,
            score,
            label = %label,
            "Sentiment normalized"
        );

        Ok(SentimentResult {
            score,
            label,
            confidence: raw.score,
            model: self.model_id().to_string(),
            timestamp: Utc::now(),
            raw: Some(raw),
            error: None,
        })
    }

    /// Analyze a text; a failed call yields a neutral fallback carrying the error
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        match self.try_analyze(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(model = %self.model_id(), error = %e, "Sentiment analysis failed, using neutral fallback");
                SentimentResult::fallback(self.model_id(), e.to_string())
            }
        }
    }

    /// Analyze texts one after another, one result per input in input order
    pub async fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentResult> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.analyze(text.as_ref()).await);
        }
        results
    }
}

/// Turns text into an [`EntityBundle`]
#[derive(Clone)]
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    pub fn model_id(&self) -> &str {
        self.recognizer.model_id()
    }

    pub fn model_info(&self) -> ModelInfo {
        self.recognizer.info()
    }

    pub async fn try_extract(&self, text: &str) -> Result<EntityBundle, InferenceError> {
        let spans = self.recognizer.recognize(text).await?;
        let bundle = classify_entities(&spans);
        debug!(spans = spans.len(), entities = bundle.len(), "Entities classified");
        Ok(bundle)
    }

    /// Extract entities; a failed call yields four empty buckets
    pub async fn extract(&self, text: &str) -> EntityBundle {
        match self.try_extract(text).await {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!(model = %self.model_id(), error = %e, "Entity extraction failed, returning empty buckets");
                EntityBundle::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityTag, RecognizedSpan};
    use crate::testing::{BrokenClassifier, BrokenRecognizer, ScriptedClassifier, ScriptedRecognizer};
    use common::SentimentLabel;

    #[tokio::test]
    async fn test_analyze_positive() {
        let analyzer = SentimentAnalyzer::new(Arc::new(ScriptedClassifier::always("POSITIVE", 0.92)));
        let result = analyzer.analyze("TSLA to the moon!!").await;

        assert_eq!(result.score, 0.92);
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.confidence, 0.92);
        assert_eq!(result.model, "scripted-sentiment");
        assert!(result.error.is_none());
        assert_eq!(result.raw.unwrap().label, "POSITIVE");
    }

    #[tokio::test]
    async fn test_analyze_neutral_label_keeps_confidence() {
        let analyzer = SentimentAnalyzer::new(Arc::new(ScriptedClassifier::always("neutral", 0.81)));
        let result = analyzer.analyze("Earnings are on Thursday").await;

        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.81);
    }

    #[tokio::test]
    async fn test_analyze_failure_falls_back() {
        let analyzer = SentimentAnalyzer::new(Arc::new(BrokenClassifier));
        let result = analyzer.analyze("anything").await;

        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.model, "broken-sentiment");
        assert!(result.error.unwrap().contains("CUDA out of memory"));
    }

    #[tokio::test]
    async fn test_try_analyze_surfaces_error() {
        let analyzer = SentimentAnalyzer::new(Arc::new(BrokenClassifier));
        let err = analyzer.try_analyze("anything").await.unwrap_err();
        assert!(matches!(err, InferenceError::Backend { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_out_of_range_score_falls_back() {
        let analyzer = SentimentAnalyzer::new(Arc::new(ScriptedClassifier::always("positive", 3.0)));
        let result = analyzer.analyze("text").await;
        assert!(result.is_fallback());
        assert_eq!(result.score, 0.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_through_failures() {
        let classifier = ScriptedClassifier::always("positive", 0.5)
            .answer("a", "positive", 0.9)
            .answer("c", "negative", 0.7)
            .failing_on("b");
        let analyzer = SentimentAnalyzer::new(Arc::new(classifier));

        let results = analyzer.analyze_batch(&["a", "b", "c"]).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].score, 0.9);
        assert!(results[1].is_fallback());
        assert_eq!(results[1].label, SentimentLabel::Neutral);
        assert_eq!(results[2].score, -0.7);
        assert_eq!(results[2].label, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_extract_entities() {
        let extractor = EntityExtractor::new(Arc::new(ScriptedRecognizer::new(vec![
            RecognizedSpan::new("TSLA", EntityTag::Org),
            RecognizedSpan::new("Elon Musk", EntityTag::Per),
        ])));
        let bundle = extractor.extract("Elon Musk says TSLA").await;

        assert!(bundle.tickers.contains("TSLA"));
        assert!(bundle.persons.contains("Elon Musk"));
    }

    #[tokio::test]
    async fn test_extract_is_idempotent() {
        let extractor = EntityExtractor::new(Arc::new(ScriptedRecognizer::new(vec![
            RecognizedSpan::new("NVDA", EntityTag::Org),
            RecognizedSpan::new("Nvidia", EntityTag::Org),
            RecognizedSpan::new("Santa Clara", EntityTag::Loc),
            RecognizedSpan::new("NVDA", EntityTag::Org),
        ])));
        let text = "NVDA (Nvidia, Santa Clara) beats again, NVDA!";

        let first = extractor.extract(text).await;
        let second = extractor.extract(text).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_extract_failure_returns_empty_buckets() {
        let extractor = EntityExtractor::new(Arc::new(BrokenRecognizer));
        let bundle = extractor.extract("anything").await;
        assert!(bundle.is_empty());
        assert!(extractor.try_extract("anything").await.is_err());
    }
}
