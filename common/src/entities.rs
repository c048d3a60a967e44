//! Extracted entity buckets

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named entities found in a text, grouped by kind.
///
/// Each bucket is a set: duplicates within a bucket are dropped, order is not
/// meaningful (sets are ordered only so serialized output is stable).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBundle {
    pub companies: BTreeSet<String>,
    pub tickers: BTreeSet<String>,
    pub locations: BTreeSet<String>,
    pub persons: BTreeSet<String>,
}

impl EntityBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.tickers.is_empty()
            && self.locations.is_empty()
            && self.persons.is_empty()
    }

    /// Total number of distinct entries across all buckets
    pub fn len(&self) -> usize {
        self.companies.len() + self.tickers.len() + self.locations.len() + self.persons.len()
    }
}
