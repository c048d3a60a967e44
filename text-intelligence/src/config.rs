//! Text intelligence configuration

use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for layered configuration
pub const ENV_PREFIX: &str = "TEXT_INTEL";

/// Token variable read when no token is configured
pub const TOKEN_ENV_VAR: &str = "HF_API_TOKEN";

/// Overall configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Sentiment classifier checkpoint
    #[serde(default = "default_sentiment_config")]
    pub sentiment: ModelConfig,

    /// Named-entity recognizer checkpoint
    #[serde(default = "default_ner_config")]
    pub ner: ModelConfig,

    /// Remote inference endpoint settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Batch processing settings
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Which checkpoint to load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
}

impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self {
            sentiment: default_sentiment_config(),
            ner: default_ner_config(),
            inference: InferenceConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

fn default_sentiment_config() -> ModelConfig {
    ModelConfig {
        model: "cardiffnlp/twitter-roberta-base-sentiment-latest".to_string(),
    }
}

fn default_ner_config() -> ModelConfig {
    ModelConfig {
        model: "dbmdz/bert-large-cased-finetuned-conll03-english".to_string(),
    }
}

/// Remote inference endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Base URL; models are served under `{endpoint}/models/{model}`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token, falls back to `HF_API_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Run one warmup inference per model at startup
    #[serde(default = "default_warmup_on_startup")]
    pub warmup_on_startup: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_token: None,
            timeout_secs: 30,
            warmup_on_startup: true,
        }
    }
}

fn default_endpoint() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_warmup_on_startup() -> bool {
    true
}

/// Batch processing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Items in flight at once; 1 keeps batches strictly sequential
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

fn default_concurrency() -> usize {
    1
}

impl IntelligenceConfig {
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            batch_concurrency: self.batch.concurrency.max(1),
        }
    }

    /// Fill the API token from the environment when none is configured
    pub fn with_env_token(mut self) -> Self {
        if self.inference.api_token.is_none() {
            self.inference.api_token = std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty());
        }
        self
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> anyhow::Result<IntelligenceConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: IntelligenceConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to TOML file
pub fn save_config(config: &IntelligenceConfig, path: &str) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// `TEXT_INTEL__SECTION__KEY` variables; `TEXT_INTEL_CONFIG` does not match
fn env_source() -> ::config::Environment {
    ::config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load defaults, then an optional TOML file, then `TEXT_INTEL__*` variables.
///
/// `TEXT_INTEL__SENTIMENT__MODEL=org/model` overrides `sentiment.model`.
pub fn load_layered(path: Option<&str>) -> anyhow::Result<IntelligenceConfig> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        if !Path::new(path).exists() {
            anyhow::bail!("config file {} does not exist", path);
        }
        builder = builder.add_source(::config::File::new(path, ::config::FileFormat::Toml));
    }

    let settings = builder
        .add_source(env_source())
        .build()?;

    let config: IntelligenceConfig = settings.try_deserialize()?;
    Ok(config.with_env_token())
}

/// Create a default configuration file template
pub fn create_config_template(path: &str) -> anyhow::Result<()> {
    let template = "# Text Intelligence Configuration

[sentiment]
# Text classification checkpoint
model = \"cardiffnlp/twitter-roberta-base-sentiment-latest\"

[ner]
# Token classification checkpoint (CoNLL-03 tags: ORG, MISC, LOC, PER)
model = \"dbmdz/bert-large-cased-finetuned-conll03-english\"

[inference]
# Models are served under {endpoint}/models/{model}
endpoint = \"https://api-inference.huggingface.co\"

# Bearer token; HF_API_TOKEN is used when unset
# api_token = \"hf_...\"

# Per-request timeout (seconds)
timeout_secs = 30

# Run one warmup inference per model at startup
warmup_on_startup = true

[batch]
# Items in flight at once; 1 keeps batches strictly sequential
concurrency = 1
";

    std::fs::write(path, template)?;
    Ok(())
}
