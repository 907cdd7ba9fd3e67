use serde::{Deserialize, Serialize};

use super::{AddressRecord, RiskCategory, ScoreRecord};

/// Outcome of evaluating one dataset entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub address: String,
    pub name: Option<String>,
    pub source: String,
    pub expected_category: RiskCategory,
    pub classified_category: RiskCategory,
    /// Absent when the provider call failed.
    pub score: Option<ScoreRecord>,
    pub correct: bool,
    /// Whether the provider call completed.
    pub succeeded: bool,
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl EvaluationResult {
    pub fn classified(
        entry: &AddressRecord,
        record: ScoreRecord,
        classified_category: RiskCategory,
        correct: bool,
        latency_ms: u64,
    ) -> Self {
        Self {
            address: entry.address.clone(),
            name: entry.name.clone(),
            source: entry.source.clone(),
            expected_category: entry.expected_category,
            classified_category,
            score: Some(record),
            correct,
            succeeded: true,
            error: None,
            latency_ms,
        }
    }

    pub fn failed(entry: &AddressRecord, error: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            address: entry.address.clone(),
            name: entry.name.clone(),
            source: entry.source.clone(),
            expected_category: entry.expected_category,
            classified_category: RiskCategory::Error,
            score: None,
            correct: false,
            succeeded: false,
            error: Some(error.into()),
            latency_ms,
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }

    /// A safe wallet flagged as `Bad`.
    pub fn is_safe_classified_as_unsafe(&self) -> bool {
        self.succeeded
            && !self.expected_category.is_bad()
            && self.classified_category.is_bad()
    }

    /// A `Bad` wallet that slipped through as something else.
    pub fn is_unsafe_classified_as_safe(&self) -> bool {
        self.succeeded
            && self.expected_category.is_bad()
            && !self.classified_category.is_bad()
    }
}
