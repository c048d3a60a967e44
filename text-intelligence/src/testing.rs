//! Test doubles for the model traits

use crate::error::InferenceError;
use crate::model::{EntityRecognizer, RecognizedSpan, TextClassifier};
use async_trait::async_trait;
use common::RawClassification;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Classifier answering from a table; unknown texts get `default` or fail
pub struct ScriptedClassifier {
    pub model_id: String,
    pub answers: HashMap<String, RawClassification>,
    pub default: Option<RawClassification>,
    pub failing: Vec<String>,
    pub calls: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn always(label: &str, score: f64) -> Self {
        Self {
            model_id: "scripted-sentiment".to_string(),
            answers: HashMap::new(),
            default: Some(RawClassification::new(label, score)),
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    pub fn answer(mut self, text: &str, label: &str, score: f64) -> Self {
        self.answers
            .insert(text.to_string(), RawClassification::new(label, score));
        self
    }
}

#[async_trait]
impl TextClassifier for ScriptedClassifier {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn classify(&self, text: &str) -> Result<RawClassification, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|t| t == text) {
            return Err(InferenceError::Unavailable(format!("scripted failure for {:?}", text)));
        }
        self.answers
            .get(text)
            .or(self.default.as_ref())
            .cloned()
            .ok_or_else(|| InferenceError::invalid_output("no scripted answer"))
    }
}

/// Classifier that always fails
pub struct BrokenClassifier;

#[async_trait]
impl TextClassifier for BrokenClassifier {
    fn model_id(&self) -> &str {
        "broken-sentiment"
    }

    async fn classify(&self, _text: &str) -> Result<RawClassification, InferenceError> {
        Err(InferenceError::Backend {
            status: 500,
            message: "CUDA out of memory".to_string(),
        })
    }
}

/// Recognizer returning the same spans for every text
pub struct ScriptedRecognizer {
    pub spans: Vec<RecognizedSpan>,
}

impl ScriptedRecognizer {
    pub fn new(spans: Vec<RecognizedSpan>) -> Self {
        Self { spans }
    }
}

#[async_trait]
impl EntityRecognizer for ScriptedRecognizer {
    fn model_id(&self) -> &str {
        "scripted-ner"
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedSpan>, InferenceError> {
        Ok(self.spans.clone())
    }
}

/// Recognizer that always fails
pub struct BrokenRecognizer;

#[async_trait]
impl EntityRecognizer for BrokenRecognizer {
    fn model_id(&self) -> &str {
        "broken-ner"
    }

    async fn recognize(&self, _text: &str) -> Result<Vec<RecognizedSpan>, InferenceError> {
        Err(InferenceError::invalid_output("token classification head missing"))
    }
}
