//! Shared data model for the text intelligence workspace
//!
//! Everything handed across crate boundaries lives here:
//! - Sentiment results and the fixed label thresholds
//! - Entity bundles produced by the extractor
//! - Analysis records passed on to persistence
//! - Aggregate statistics over analysis records

pub mod entities;
pub mod record;
pub mod sentiment;
pub mod stats;

pub use entities::EntityBundle;
pub use record::AnalysisRecord;
pub use sentiment::{RawClassification, SentimentLabel, SentimentResult};
pub use stats::{SentimentStats, TickerMention};

// Re-export for downstream crates
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
