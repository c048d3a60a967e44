//! Model capability traits and the types they exchange
//!
//! Pretrained models are black boxes to this crate. Backends implement
//! [`TextClassifier`] and [`EntityRecognizer`]; the analyzers only ever see
//! these traits.

use crate::error::InferenceError;
use async_trait::async_trait;
use common::RawClassification;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Description of a loaded model, for auditing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
    pub backend: String,
    pub endpoint: Option<String>,
}

/// Both models behind a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub sentiment_model: ModelInfo,
    pub ner_model: ModelInfo,
}

/// Entity category assigned by a recognizer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Org,
    Misc,
    Loc,
    Per,
    Other(String),
}

impl EntityTag {
    /// Parse a recognizer tag.
    ///
    /// Accepts plain (`ORG`) and IOB-prefixed (`B-ORG`, `I-ORG`) forms in any case.
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        let bare = upper
            .strip_prefix("B-")
            .or_else(|| upper.strip_prefix("I-"))
            .unwrap_or(&upper);

        match bare {
            "ORG" => EntityTag::Org,
            "MISC" => EntityTag::Misc,
            "LOC" => EntityTag::Loc,
            "PER" => EntityTag::Per,
            _ => EntityTag::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityTag::Org => f.write_str("ORG"),
            EntityTag::Misc => f.write_str("MISC"),
            EntityTag::Loc => f.write_str("LOC"),
            EntityTag::Per => f.write_str("PER"),
            EntityTag::Other(tag) => f.write_str(tag),
        }
    }
}

/// A tagged span produced by a recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedSpan {
    pub text: String,
    pub tag: EntityTag,
}

impl RecognizedSpan {
    pub fn new(text: impl Into<String>, tag: EntityTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

/// Text classification capability: `classify(text) -> {label, score}`
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Identifier of the checkpoint in use
    fn model_id(&self) -> &str;

    /// Classify a text. The returned score is the model's confidence in [0, 1].
    async fn classify(&self, text: &str) -> Result<RawClassification, InferenceError>;

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model_id().to_string(),
            backend: "unknown".to_string(),
            endpoint: None,
        }
    }
}

/// Named-entity recognition capability: `recognize(text) -> [{text, tag}]`
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Identifier of the checkpoint in use
    fn model_id(&self) -> &str;

    async fn recognize(&self, text: &str) -> Result<Vec<RecognizedSpan>, InferenceError>;

    fn info(&self) -> ModelInfo {
        ModelInfo {
            model_id: self.model_id().to_string(),
            backend: "unknown".to_string(),
            endpoint: None,
        }
    }
}
