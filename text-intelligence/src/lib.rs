//! Text Intelligence Pipeline
//!
//! Turns a social post into a normalized sentiment judgment plus the named
//! entities it mentions. It includes:
//! - Model capability traits (text classification, entity recognition)
//! - Sentiment normalization onto [-1, 1] with fixed label thresholds
//! - Ticker/company/location/person bucketing of recognized entities
//! - A service composing both into per-post analysis records
//! - Hugging Face Inference API backends

pub mod analyzer;
pub mod config;
pub mod entities;
pub mod error;
pub mod huggingface;
pub mod model;
pub mod normalizer;
pub mod pipeline;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use analyzer::{EntityExtractor, SentimentAnalyzer};
pub use config::{load_config, load_layered, IntelligenceConfig};
pub use error::{InferenceError, ModelInitError};
pub use huggingface::{HuggingFaceClassifier, HuggingFaceRecognizer};
pub use model::{EntityRecognizer, EntityTag, ModelInfo, RecognizedSpan, ServiceInfo, TextClassifier};
pub use pipeline::{PipelineConfig, PostInput, TextIntelligenceService};

// Re-export common types for convenience
pub use common::{AnalysisRecord, EntityBundle, RawClassification, SentimentLabel, SentimentResult, SentimentStats};
