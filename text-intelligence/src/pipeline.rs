//! Text intelligence service - composes sentiment and entity analysis
//!
//! The service owns the two model handles and is built once at startup.
//! Cloning it is cheap and shares the same read-only handles, so it can be
//! handed to every caller without a lock.

use crate::analyzer::{EntityExtractor, SentimentAnalyzer};
use crate::model::{EntityRecognizer, ServiceInfo, TextClassifier};
use common::{AnalysisRecord, EntityBundle, SentimentResult};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Tuning for the pipeline service
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Items in flight during batch analysis. 1 means strictly sequential.
    pub batch_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: 1,
        }
    }
}

/// A post to analyze
#[derive(Debug, Clone)]
pub struct PostInput {
    pub author_id: i64,
    pub post_id: i64,
    pub text: String,
}

/// Sentiment plus entity extraction over shared model handles
#[derive(Clone)]
pub struct TextIntelligenceService {
    sentiment: SentimentAnalyzer,
    entities: EntityExtractor,
    config: PipelineConfig,
}

impl TextIntelligenceService {
    pub fn new(classifier: Arc<dyn TextClassifier>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::with_config(classifier, recognizer, PipelineConfig::default())
    }

    pub fn with_config(
        classifier: Arc<dyn TextClassifier>,
        recognizer: Arc<dyn EntityRecognizer>,
        config: PipelineConfig,
    ) -> Self {
        info!(
            sentiment_model = %classifier.model_id(),
            ner_model = %recognizer.model_id(),
            batch_concurrency = config.batch_concurrency,
            "Text intelligence service ready"
        );

        Self {
            sentiment: SentimentAnalyzer::new(classifier),
            entities: EntityExtractor::new(recognizer),
            config,
        }
    }

    /// Normalized sentiment for a text; never fails
    pub async fn analyze(&self, text: &str) -> SentimentResult {
        self.sentiment.analyze(text).await
    }

    /// Entity buckets for a text; never fails
    pub async fn extract_entities(&self, text: &str) -> EntityBundle {
        self.entities.extract(text).await
    }

    /// Full analysis of one post.
    ///
    /// Both stages run regardless of the other's outcome. A failed stage
    /// contributes its fallback and is flagged on the record.
    pub async fn analyze_post(&self, text: &str, author_id: i64, post_id: i64) -> AnalysisRecord {
        let (sentiment, entities) = tokio::join!(
            self.sentiment.analyze(text),
            self.entities.try_extract(text)
        );

        let (entities, entities_error) = match entities {
            Ok(bundle) => (bundle, None),
            Err(e) => {
                warn!(post_id, error = %e, "Entity extraction failed, returning empty buckets");
                (EntityBundle::new(), Some(e.to_string()))
            }
        };

        let record = AnalysisRecord::compose(
            author_id,
            post_id,
            sentiment,
            entities,
            entities_error,
            self.entities.model_id(),
        );

        info!(
            author_id,
            post_id,
            sentiment = %record.sentiment_label,
            score = record.sentiment_score,
            tickers = record.mentioned_stocks.len(),
            complete = record.is_complete(),
            "Post analyzed"
        );

        record
    }

    /// Sentiment for each text, same length and order as the input.
    ///
    /// Sequential unless `batch_concurrency` is above 1; the ordered buffer
    /// keeps output order either way.
    pub async fn analyze_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<SentimentResult> {
        if self.config.batch_concurrency <= 1 {
            return self.sentiment.analyze_batch(texts).await;
        }

        stream::iter(texts)
            .map(|text| self.sentiment.analyze(text.as_ref()))
            .buffered(self.config.batch_concurrency)
            .collect::<Vec<_>>()
            .await
    }

    /// Batch form of [`analyze_post`](Self::analyze_post), order-preserving
    pub async fn analyze_posts(&self, posts: &[PostInput]) -> Vec<AnalysisRecord> {
        let concurrency = self.config.batch_concurrency.max(1);

        stream::iter(posts)
            .map(|post| self.analyze_post(&post.text, post.author_id, post.post_id))
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await
    }

    pub fn service_info(&self) -> ServiceInfo {
        ServiceInfo {
            sentiment_model: self.sentiment.model_info(),
            ner_model: self.entities.model_info(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
