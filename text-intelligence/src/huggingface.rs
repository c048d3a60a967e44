//! Hugging Face Inference API backends
//!
//! Both capabilities are served by `POST {endpoint}/models/{model}`. The
//! classifier takes the top-scoring label; the recognizer asks the server to
//! aggregate word pieces so each span arrives with a single CoNLL tag.

use crate::config::IntelligenceConfig;
use crate::error::{InferenceError, ModelInitError};
use crate::model::{EntityRecognizer, EntityTag, ModelInfo, RecognizedSpan, TextClassifier};
use async_trait::async_trait;
use common::RawClassification;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

const BACKEND_NAME: &str = "huggingface-inference";

/// Text sent when verifying a model at startup
const WARMUP_TEXT: &str = "Apple shares rose in New York.";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<serde_json::Value>,
    options: RequestOptions,
}

#[derive(Debug, Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Classification bodies come nested or flat depending on the model card
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct TokenEntity {
    word: String,
    /// Set when the server aggregated word pieces
    #[serde(default)]
    entity_group: Option<String>,
    /// Per-token IOB tag, set without aggregation
    #[serde(default)]
    entity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenClassificationResponse {
    Entities(Vec<TokenEntity>),
    Error { error: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pick the top-scoring label out of a classification body
fn parse_classification(body: &str) -> Result<RawClassification, InferenceError> {
    let response: ClassificationResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::invalid_output(format!("unexpected classification body: {}", e)))?;

    let candidates = match response {
        ClassificationResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        ClassificationResponse::Flat(candidates) => candidates,
        ClassificationResponse::Error { error } => return Err(InferenceError::Unavailable(error)),
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .map(|best| RawClassification::new(best.label, best.score))
        .ok_or_else(|| InferenceError::invalid_output("classifier returned no labels"))
}

fn parse_entities(body: &str) -> Result<Vec<RecognizedSpan>, InferenceError> {
    let response: TokenClassificationResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::invalid_output(format!("unexpected entity body: {}", e)))?;

    let entities = match response {
        TokenClassificationResponse::Entities(entities) => entities,
        TokenClassificationResponse::Error { error } => return Err(InferenceError::Unavailable(error)),
    };

    entities
        .into_iter()
        .map(|entity| {
            let tag = entity
                .entity_group
                .or(entity.entity)
                .ok_or_else(|| InferenceError::invalid_output(format!("span {:?} has no tag", entity.word)))?;
            Ok(RecognizedSpan::new(entity.word.trim(), EntityTag::parse(&tag)))
        })
        .collect()
}

/// HTTP plumbing shared by both backends
#[derive(Debug, Clone)]
struct InferenceClient {
    client: Client,
    url: String,
    endpoint: String,
    api_token: Option<String>,
}

impl InferenceClient {
    fn new(config: &IntelligenceConfig, model_id: &str) -> Result<Self, ModelInitError> {
        if model_id.trim().is_empty() {
            return Err(ModelInitError::EmptyModelId);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.inference.timeout_secs))
            .build()?;
        let endpoint = config.inference.endpoint.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            url: format!("{}/models/{}", endpoint, model_id),
            endpoint,
            api_token: config.inference.api_token.clone(),
        })
    }

    /// POST a request and return the body of a successful response
    async fn post(&self, request: &InferenceRequest<'_>) -> Result<String, InferenceError> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(InferenceError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }
}

/// Sentiment classifier served by the Inference API
#[derive(Debug, Clone)]
pub struct HuggingFaceClassifier {
    model_id: String,
    http: InferenceClient,
}

impl HuggingFaceClassifier {
    /// Build the client without contacting the server
    pub fn new(config: &IntelligenceConfig) -> Result<Self, ModelInitError> {
        let model_id = config.sentiment.model.clone();
        let http = InferenceClient::new(config, &model_id)?;
        Ok(Self { model_id, http })
    }

    /// Build the client and, if configured, verify the model answers
    pub async fn connect(config: &IntelligenceConfig) -> Result<Self, ModelInitError> {
        let classifier = Self::new(config)?;

        if config.inference.warmup_on_startup {
            if let Err(e) = classifier.classify(WARMUP_TEXT).await {
                error!(model = %classifier.model_id, error = %e, "Sentiment model warmup failed");
                return Err(ModelInitError::Unavailable {
                    model: classifier.model_id.clone(),
                    reason: e.to_string(),
                });
            }
        }

        info!(model = %classifier.model_id, endpoint = %classifier.http.endpoint, "Sentiment classifier initialized");
        Ok(classifier)
    }
}

#[async_trait]
impl TextClassifier for HuggingFaceClassifier {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn classify(&self, text: &str) -> Result<RawClassification, InferenceError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: None,
            options: RequestOptions { wait_for_model: true },
        };

        let body = self.http.post(&request).await?;
        let raw = parse_classification(&body)?;
        debug!(model = %self.model_id, label = %raw.label, score = raw.score, "Classified text");
        Ok(raw)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model_id.clone(),
            backend: BACKEND_NAME.to_string(),
            endpoint: Some(self.http.url.clone()),
        }
    }
}

/// Named-entity recognizer served by the Inference API
#[derive(Debug, Clone)]
pub struct HuggingFaceRecognizer {
    model_id: String,
    http: InferenceClient,
}

impl HuggingFaceRecognizer {
    pub fn new(config: &IntelligenceConfig) -> Result<Self, ModelInitError> {
        let model_id = config.ner.model.clone();
        let http = InferenceClient::new(config, &model_id)?;
        Ok(Self { model_id, http })
    }

    pub async fn connect(config: &IntelligenceConfig) -> Result<Self, ModelInitError> {
        let recognizer = Self::new(config)?;

        if config.inference.warmup_on_startup {
            if let Err(e) = recognizer.recognize(WARMUP_TEXT).await {
                error!(model = %recognizer.model_id, error = %e, "NER model warmup failed");
                return Err(ModelInitError::Unavailable {
                    model: recognizer.model_id.clone(),
                    reason: e.to_string(),
                });
            }
        }

        info!(model = %recognizer.model_id, endpoint = %recognizer.http.endpoint, "Entity recognizer initialized");
        Ok(recognizer)
    }
}

#[async_trait]
impl EntityRecognizer for HuggingFaceRecognizer {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>, InferenceError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Some(serde_json::json!({ "aggregation_strategy": "simple" })),
            options: RequestOptions { wait_for_model: true },
        };

        let body = self.http.post(&request).await?;
        let spans = parse_entities(&body)?;
        debug!(model = %self.model_id, spans = spans.len(), "Recognized entities");
        Ok(spans)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model_id.clone(),
            backend: BACKEND_NAME.to_string(),
            endpoint: Some(self.http.url.clone()),
        }
    }
}
